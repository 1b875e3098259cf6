//! Report export route

use axum::extract::State;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::api::extract::ApiJson;
use crate::api::response::FileDownload;
use crate::app::AppState;
use crate::auth::RequireToken;
use crate::display::date_range::RangeSelection;
use crate::domain::{ReportExport, ReportFormat};
use crate::error::{ApiError, ApiResult};

use super::dashboard::DEFAULT_PRESET;

#[derive(Debug, Deserialize)]
pub struct ExportReportRequest {
    pub report_type: String,
    pub format: ReportFormat,
    #[serde(flatten)]
    pub range: RangeSelection,
}

/// Export a report and stream the file back as an attachment
pub async fn export_report(
    State(state): State<Arc<AppState>>,
    RequireToken(ctx): RequireToken,
    ApiJson(req): ApiJson<ExportReportRequest>,
) -> ApiResult<FileDownload> {
    let report_type = req.report_type.trim();
    if report_type.is_empty() {
        return Err(ApiError::BadRequest("report_type is required".to_string()));
    }

    let range = req.range.resolve(Utc::now().date_naive(), DEFAULT_PRESET)?;
    let export = ReportExport {
        report_type: report_type.to_string(),
        format: req.format,
        start_date: range.start,
        end_date: range.end,
    };

    let file = state.backend.export_report(&ctx, &export).await?;

    tracing::info!(
        report_type = %export.report_type,
        format = export.format.extension(),
        bytes = file.bytes.len(),
        "Report exported"
    );

    let content_type = file
        .content_type
        .filter(|ct| !ct.trim().is_empty())
        .unwrap_or_else(|| export.format.mime_type().to_string());

    Ok(FileDownload {
        bytes: file.bytes,
        content_type,
        filename: export.filename(),
    })
}

use axum::extract::Path;
use chrono::Utc;
use serde::Serialize;

use crate::api::response::DataResponse;
use crate::auth::RequireToken;
use crate::display::date_range::{DateRange, DateRangePreset};
use crate::error::ApiResult;

#[derive(Debug, Serialize)]
pub struct ResolvedPreset {
    pub preset: DateRangePreset,
    #[serde(flatten)]
    pub range: DateRange,
    pub days: i64,
}

/// All presets resolved against today's date, for the range picker
pub async fn list_presets(_auth: RequireToken) -> DataResponse<Vec<ResolvedPreset>> {
    let today = Utc::now().date_naive();
    let presets = DateRangePreset::ALL
        .into_iter()
        .map(|preset| {
            let range = preset.resolve(today);
            ResolvedPreset {
                preset,
                days: range.num_days(),
                range,
            }
        })
        .collect();

    DataResponse::new(presets)
}

/// Resolve a named preset against today's date
pub async fn resolve_preset(
    _auth: RequireToken,
    Path(preset): Path<String>,
) -> ApiResult<DataResponse<ResolvedPreset>> {
    let preset: DateRangePreset = preset.parse()?;
    let range = preset.resolve(Utc::now().date_naive());

    Ok(DataResponse::new(ResolvedPreset {
        preset,
        days: range.num_days(),
        range,
    }))
}

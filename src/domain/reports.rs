//! Custom report export.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// File formats the backend can export a report in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Csv,
    #[serde(alias = "xlsx")]
    Excel,
    Json,
}

impl ReportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Csv => "text/csv; charset=utf-8",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Csv => "csv",
            Self::Excel => "xlsx",
            Self::Json => "json",
        }
    }
}

/// Export request as sent to the backend.
#[derive(Debug, Clone, Serialize)]
pub struct ReportExport {
    pub report_type: String,
    pub format: ReportFormat,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ReportExport {
    /// Download name such as `bookings-2024-05-01-2024-05-31.csv`.
    pub fn filename(&self) -> String {
        let slug: String = self
            .report_type
            .trim()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        let slug = slug.trim_matches('-');
        let slug = if slug.is_empty() { "report" } else { slug };

        format!(
            "{}-{}-{}.{}",
            slug,
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d"),
            self.format.extension()
        )
    }
}

/// Raw export bytes plus the content type the backend declared, if any.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

//! Status-to-colour mapping for badges across bookings, payments,
//! inspections and disputes.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Success,
    Warning,
    Danger,
    Info,
    Neutral,
}

impl StatusTone {
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "badge-success",
            Self::Warning => "badge-warning",
            Self::Danger => "badge-danger",
            Self::Info => "badge-info",
            Self::Neutral => "badge-neutral",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Success => "#16a34a",
            Self::Warning => "#d97706",
            Self::Danger => "#dc2626",
            Self::Info => "#2563eb",
            Self::Neutral => "#6b7280",
        }
    }
}

fn normalize(status: &str) -> String {
    status.trim().to_lowercase().replace(['-', ' '], "_")
}

pub fn status_tone(status: &str) -> StatusTone {
    match normalize(status).as_str() {
        "completed" | "confirmed" | "active" | "approved" | "resolved" | "verified" | "paid"
        | "passed" => StatusTone::Success,
        "pending" | "in_progress" | "under_review" | "processing" | "scheduled"
        | "awaiting_payment" | "partially_refunded" => StatusTone::Warning,
        "cancelled" | "canceled" | "rejected" | "failed" | "disputed" | "overdue"
        | "suspended" | "refunded" | "expired" => StatusTone::Danger,
        "draft" | "new" | "open" => StatusTone::Info,
        _ => StatusTone::Neutral,
    }
}

/// Ready-to-render badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub value: Option<String>,
    pub label: String,
    pub tone: StatusTone,
    pub css_class: &'static str,
    pub color: &'static str,
}

/// Badge for an optional status; a missing one renders as "Unknown".
pub fn status_badge(status: Option<&str>) -> StatusBadge {
    let status = status.map(str::trim).filter(|s| !s.is_empty());
    let tone = status.map(status_tone).unwrap_or(StatusTone::Neutral);

    StatusBadge {
        value: status.map(normalize),
        label: status.map(humanize).unwrap_or_else(|| "Unknown".to_string()),
        tone,
        css_class: tone.css_class(),
        color: tone.color(),
    }
}

/// `in_progress` -> `In Progress`
fn humanize(status: &str) -> String {
    normalize(status)
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

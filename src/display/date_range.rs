//! Date-range presets used by the dashboard and report filters.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::error::ApiError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("unknown date range preset '{0}'")]
    UnknownPreset(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("start date {start} is after end date {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },

    #[error("a custom range needs both a start and an end date")]
    IncompleteCustom,

    #[error("date range spans {days} days, the limit is {max}")]
    TooLong { days: i64, max: i64 },
}

impl From<DateRangeError> for ApiError {
    fn from(err: DateRangeError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Inclusive calendar-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// A user-picked range; rejects `start > end`.
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Number of days covered, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateRangePreset {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "yesterday")]
    Yesterday,
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[serde(rename = "last_30_days")]
    Last30Days,
    #[serde(rename = "this_month")]
    ThisMonth,
    #[serde(rename = "last_month")]
    LastMonth,
    #[serde(rename = "this_quarter")]
    ThisQuarter,
    #[serde(rename = "this_year")]
    ThisYear,
    #[serde(rename = "last_year")]
    LastYear,
}

impl DateRangePreset {
    pub const ALL: [DateRangePreset; 9] = [
        Self::Today,
        Self::Yesterday,
        Self::Last7Days,
        Self::Last30Days,
        Self::ThisMonth,
        Self::LastMonth,
        Self::ThisQuarter,
        Self::ThisYear,
        Self::LastYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::Last7Days => "last_7_days",
            Self::Last30Days => "last_30_days",
            Self::ThisMonth => "this_month",
            Self::LastMonth => "last_month",
            Self::ThisQuarter => "this_quarter",
            Self::ThisYear => "this_year",
            Self::LastYear => "last_year",
        }
    }

    /// Concrete range for this preset as seen on `today`.
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        let (start, end) = match self {
            Self::Today => (today, today),
            Self::Yesterday => {
                let day = today - Duration::days(1);
                (day, day)
            }
            Self::Last7Days => (today - Duration::days(6), today),
            Self::Last30Days => (today - Duration::days(29), today),
            Self::ThisMonth => (first_of_month(today), today),
            Self::LastMonth => {
                let end = first_of_month(today) - Duration::days(1);
                (first_of_month(end), end)
            }
            Self::ThisQuarter => {
                let quarter_month = (today.month0() / 3) * 3 + 1;
                (ymd(today.year(), quarter_month, 1), today)
            }
            Self::ThisYear => (ymd(today.year(), 1, 1), today),
            Self::LastYear => (ymd(today.year() - 1, 1, 1), ymd(today.year() - 1, 12, 31)),
        };
        DateRange { start, end }
    }
}

impl FromStr for DateRangePreset {
    type Err = DateRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str() == normalized)
            .ok_or_else(|| DateRangeError::UnknownPreset(s.trim().to_string()))
    }
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    // Only ever called with real calendar dates
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Parses `YYYY-MM-DD`, also accepting a full timestamp and keeping its date.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()
}

/// Range selection as it arrives in a query string or request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RangeSelection {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

/// Longest range a caller may select explicitly. Two years covers every
/// preset and a year-over-year comparison.
pub const MAX_RANGE_DAYS: i64 = 731;

impl RangeSelection {
    /// Explicit `start`/`end` win; `range=custom` demands them. Otherwise the
    /// named preset, or `default` when none was given.
    pub fn resolve(
        &self,
        today: NaiveDate,
        default: DateRangePreset,
    ) -> Result<DateRange, DateRangeError> {
        let start = non_blank(self.start.as_deref());
        let end = non_blank(self.end.as_deref());
        let range = non_blank(self.range.as_deref());

        match (start, end) {
            (Some(start), Some(end)) => {
                let start = parse_day(start)
                    .ok_or_else(|| DateRangeError::InvalidDate(start.to_string()))?;
                let end =
                    parse_day(end).ok_or_else(|| DateRangeError::InvalidDate(end.to_string()))?;
                let range = DateRange::custom(start, end)?;
                if range.num_days() > MAX_RANGE_DAYS {
                    return Err(DateRangeError::TooLong {
                        days: range.num_days(),
                        max: MAX_RANGE_DAYS,
                    });
                }
                Ok(range)
            }
            _ if range.is_some_and(|r| r.eq_ignore_ascii_case("custom")) => {
                Err(DateRangeError::IncompleteCustom)
            }
            _ => {
                let preset = match range {
                    Some(name) => name.parse()?,
                    None => default,
                };
                Ok(preset.resolve(today))
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

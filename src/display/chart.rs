//! Normalises analytics series into fixed daily buckets for the dashboard
//! charts.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::SeriesPoint;

use super::date_range::{parse_day, DateRange};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub label: String,
    pub value: Decimal,
    /// Bar height relative to the largest value, 0..=100
    pub height_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
    pub total: Decimal,
    pub max: Decimal,
}

/// One point per day of `range`: same-day points summed, gaps zero-filled,
/// out-of-range or undated points dropped.
pub fn normalize_series(points: &[SeriesPoint], range: &DateRange) -> ChartSeries {
    let mut buckets: BTreeMap<NaiveDate, Decimal> =
        range.days().map(|day| (day, Decimal::ZERO)).collect();

    for point in points {
        let Some(day) = point.date.as_deref().and_then(parse_day) else {
            continue;
        };
        if let Some(bucket) = buckets.get_mut(&day) {
            // Saturate instead of panicking on absurd backend values
            *bucket = bucket.saturating_add(point.value.unwrap_or_default());
        }
    }

    let total = buckets
        .values()
        .fold(Decimal::ZERO, |acc, value| acc.saturating_add(*value));
    let max = buckets
        .values()
        .copied()
        .max()
        .unwrap_or_default()
        .max(Decimal::ZERO);

    let points = buckets
        .into_iter()
        .map(|(date, value)| ChartPoint {
            date,
            label: date.format("%b %d").to_string(),
            value,
            height_percent: height(value, max),
        })
        .collect();

    ChartSeries { points, total, max }
}

fn height(value: Decimal, max: Decimal) -> Decimal {
    if max <= Decimal::ZERO || value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (value / max * Decimal::ONE_HUNDRED).round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, dec};

    fn point(day: &str, value: &str) -> SeriesPoint {
        SeriesPoint {
            date: Some(day.to_string()),
            value: Some(dec(value)),
        }
    }

    fn range() -> DateRange {
        DateRange::custom(date("2024-05-01"), date("2024-05-04")).expect("valid range")
    }

    #[test]
    fn fills_gaps_and_sums_duplicates() {
        let series = normalize_series(
            &[
                point("2024-05-01", "10"),
                point("2024-05-03T08:00:00Z", "15"),
                point("2024-05-03", "25"),
                point("2024-06-01", "999"),
                SeriesPoint::default(),
            ],
            &range(),
        );

        let values: Vec<Decimal> = series.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![dec("10"), dec("0"), dec("40"), dec("0")]);
        assert_eq!(series.total, dec("50"));
        assert_eq!(series.max, dec("40"));
        assert_eq!(series.points[0].label, "May 01");
        assert_eq!(series.points[0].height_percent, dec("25"));
        assert_eq!(series.points[2].height_percent, dec("100"));
    }

    #[test]
    fn all_zero_series_has_flat_heights() {
        let series = normalize_series(&[], &range());
        assert_eq!(series.points.len(), 4);
        assert!(series
            .points
            .iter()
            .all(|p| p.height_percent == Decimal::ZERO));
        assert_eq!(series.max, Decimal::ZERO);
    }

    #[test]
    fn negative_days_do_not_go_below_zero() {
        let series = normalize_series(
            &[point("2024-05-01", "-20"), point("2024-05-02", "30")],
            &range(),
        );
        assert_eq!(series.points[0].height_percent, Decimal::ZERO);
        assert_eq!(series.total, dec("10"));
        assert_eq!(series.points[1].height_percent, dec("100"));
    }

    #[test]
    fn huge_values_saturate_instead_of_overflowing() {
        let series = normalize_series(
            &[
                SeriesPoint {
                    date: Some("2024-05-01".into()),
                    value: Some(Decimal::MAX),
                },
                SeriesPoint {
                    date: Some("2024-05-01".into()),
                    value: Some(Decimal::MAX),
                },
                SeriesPoint {
                    date: Some("2024-05-02".into()),
                    value: Some(Decimal::MAX),
                },
            ],
            &range(),
        );

        assert_eq!(series.points[0].value, Decimal::MAX);
        assert_eq!(series.total, Decimal::MAX);
        assert_eq!(series.max, Decimal::MAX);
        assert_eq!(series.points[0].height_percent, Decimal::ONE_HUNDRED);
    }
}

//! Admin dashboard payloads: headline stats, analytics series and realtime
//! counters.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::lenient;

/// Headline counters from `/admin/stats`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardStats {
    #[serde(default, alias = "totalUsers", deserialize_with = "lenient::count")]
    pub total_users: Option<u64>,

    #[serde(default, alias = "totalBookings", deserialize_with = "lenient::count")]
    pub total_bookings: Option<u64>,

    #[serde(default, alias = "activeBookings", deserialize_with = "lenient::count")]
    pub active_bookings: Option<u64>,

    #[serde(default, alias = "totalProducts", deserialize_with = "lenient::count")]
    pub total_products: Option<u64>,

    #[serde(default, alias = "openDisputes", deserialize_with = "lenient::count")]
    pub open_disputes: Option<u64>,

    #[serde(default, alias = "pendingInspections", deserialize_with = "lenient::count")]
    pub pending_inspections: Option<u64>,

    #[serde(default, alias = "totalRevenue", deserialize_with = "lenient::decimal")]
    pub total_revenue: Option<Decimal>,

    #[serde(default)]
    pub currency: Option<String>,
}

/// One point of an analytics time series.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeriesPoint {
    #[serde(default, alias = "day", alias = "period")]
    pub date: Option<String>,

    #[serde(default, alias = "amount", alias = "count", deserialize_with = "lenient::decimal")]
    pub value: Option<Decimal>,
}

/// Time series from `/admin/analytics`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Analytics {
    #[serde(default, alias = "revenueTrend", alias = "revenue_trend")]
    pub revenue: Vec<SeriesPoint>,

    #[serde(default, alias = "bookingTrend", alias = "booking_trend")]
    pub bookings: Vec<SeriesPoint>,

    #[serde(default)]
    pub currency: Option<String>,
}

/// Live counters from `/admin/realtime-metrics`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RealtimeMetrics {
    #[serde(default, alias = "activeUsers", deserialize_with = "lenient::count")]
    pub active_users: Option<u64>,

    #[serde(default, alias = "bookingsToday", deserialize_with = "lenient::count")]
    pub bookings_today: Option<u64>,

    #[serde(default, alias = "revenueToday", deserialize_with = "lenient::decimal")]
    pub revenue_today: Option<Decimal>,

    #[serde(default, alias = "pendingApprovals", deserialize_with = "lenient::count")]
    pub pending_approvals: Option<u64>,
}

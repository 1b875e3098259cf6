//! Dashboard route
//!
//! Stats cards, daily revenue and booking charts, and realtime metrics for
//! one date range. The three backend reads run concurrently and the view
//! fails as a whole if any of them fails.

use axum::extract::State;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

use crate::api::extract::ApiQuery;
use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::auth::RequireToken;
use crate::display::chart::{normalize_series, ChartSeries};
use crate::display::date_range::{DateRange, DateRangePreset, RangeSelection};
use crate::display::price::{format_money, format_optional, NOT_AVAILABLE};
use crate::domain::{DashboardStats, RealtimeMetrics};
use crate::error::ApiResult;

/// Preset used when the request names none.
pub const DEFAULT_PRESET: DateRangePreset = DateRangePreset::Last30Days;

#[derive(Debug, Serialize)]
pub struct StatCard {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct RealtimeView {
    pub active_users: String,
    pub bookings_today: String,
    pub revenue_today: String,
    pub pending_approvals: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub range: DateRange,
    pub currency: String,
    pub cards: Vec<StatCard>,
    pub revenue: ChartSeries,
    pub revenue_total: String,
    pub bookings: ChartSeries,
    pub realtime: RealtimeView,
}

fn count(value: Option<u64>) -> String {
    value
        .map(|n| n.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn stat_cards(stats: &DashboardStats, currency: &str) -> Vec<StatCard> {
    vec![
        StatCard {
            key: "total_users",
            label: "Total Users",
            value: count(stats.total_users),
        },
        StatCard {
            key: "total_bookings",
            label: "Total Bookings",
            value: count(stats.total_bookings),
        },
        StatCard {
            key: "active_bookings",
            label: "Active Bookings",
            value: count(stats.active_bookings),
        },
        StatCard {
            key: "total_products",
            label: "Products",
            value: count(stats.total_products),
        },
        StatCard {
            key: "total_revenue",
            label: "Total Revenue",
            value: format_optional(stats.total_revenue, currency),
        },
        StatCard {
            key: "open_disputes",
            label: "Open Disputes",
            value: count(stats.open_disputes),
        },
        StatCard {
            key: "pending_inspections",
            label: "Pending Inspections",
            value: count(stats.pending_inspections),
        },
    ]
}

fn realtime_view(metrics: &RealtimeMetrics, currency: &str) -> RealtimeView {
    RealtimeView {
        active_users: count(metrics.active_users),
        bookings_today: count(metrics.bookings_today),
        // Zero revenue today is a real figure, unlike a zero booking total
        revenue_today: format_money(metrics.revenue_today.unwrap_or(Decimal::ZERO), currency),
        pending_approvals: count(metrics.pending_approvals),
    }
}

/// Dashboard for `range=<preset>` or an explicit `start`/`end`
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    RequireToken(ctx): RequireToken,
    ApiQuery(selection): ApiQuery<RangeSelection>,
) -> ApiResult<DataResponse<DashboardView>> {
    let today = Utc::now().date_naive();
    let range = selection.resolve(today, DEFAULT_PRESET)?;

    let backend = &state.backend;
    let (stats, analytics, realtime) = futures::try_join!(
        backend.dashboard_stats(&ctx),
        backend.analytics(&ctx, &range),
        backend.realtime_metrics(&ctx),
    )?;

    let currency = [stats.currency.as_deref(), analytics.currency.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|c| !c.is_empty())
        .unwrap_or(&state.settings.fallback_currency)
        .to_uppercase();

    let revenue = normalize_series(&analytics.revenue, &range);
    let bookings = normalize_series(&analytics.bookings, &range);

    tracing::debug!(
        start = %range.start,
        end = %range.end,
        revenue_points = analytics.revenue.len(),
        booking_points = analytics.bookings.len(),
        "Dashboard assembled"
    );

    Ok(DataResponse::new(DashboardView {
        range,
        cards: stat_cards(&stats, &currency),
        revenue_total: format_money(revenue.total, &currency),
        realtime: realtime_view(&realtime, &currency),
        revenue,
        bookings,
        currency,
    }))
}

pub mod bookings;
pub mod dashboard;
pub mod date_ranges;
pub mod health;
pub mod pricing;
pub mod reports;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public routes
        .route("/health", get(health::health_check))
        // Bookings
        .route("/bookings", get(bookings::list_bookings))
        .route("/bookings/:booking_id", get(bookings::get_booking))
        // Pricing
        .route(
            "/products/:product_id/prices",
            get(pricing::list_product_prices),
        )
        .route("/pricing/calculate", post(pricing::calculate_price))
        .route("/pricing/compare", post(pricing::compare_prices))
        // Dashboard
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/date-ranges", get(date_ranges::list_presets))
        .route("/date-ranges/:preset", get(date_ranges::resolve_preset))
        // Reports
        .route("/reports/export", post(reports::export_report))
}

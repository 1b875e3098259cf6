//! Service layer for the marketplace backend.
//!
//! Route handlers talk to the backend only through [`MarketplaceApi`], so the
//! HTTP client can be swapped for an in-memory stub in tests.

pub mod backend_client;

use async_trait::async_trait;

use crate::api::pagination::PageInfo;
use crate::auth::AdminContext;
use crate::display::date_range::DateRange;
use crate::domain::{
    Analytics, Booking, BookingListQuery, DashboardStats, PriceCalculation,
    PriceCalculationRequest, PriceComparisonEntry, PriceComparisonRequest, ProductPrice,
    RealtimeMetrics, ReportExport, ReportFile,
};
use crate::error::ApiError;

pub use backend_client::BackendClient;

/// One page of a backend list plus whatever pagination block came with it.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

/// Read-side operations of the marketplace backend used by the admin views.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    async fn list_bookings(
        &self,
        ctx: &AdminContext,
        query: &BookingListQuery,
    ) -> Result<Page<Booking>, ApiError>;

    async fn get_booking(&self, ctx: &AdminContext, booking_id: &str) -> Result<Booking, ApiError>;

    async fn list_product_prices(
        &self,
        ctx: &AdminContext,
        product_id: &str,
    ) -> Result<Vec<ProductPrice>, ApiError>;

    async fn calculate_price(
        &self,
        ctx: &AdminContext,
        request: &PriceCalculationRequest,
    ) -> Result<PriceCalculation, ApiError>;

    async fn compare_prices(
        &self,
        ctx: &AdminContext,
        request: &PriceComparisonRequest,
    ) -> Result<Vec<PriceComparisonEntry>, ApiError>;

    async fn dashboard_stats(&self, ctx: &AdminContext) -> Result<DashboardStats, ApiError>;

    async fn analytics(&self, ctx: &AdminContext, range: &DateRange)
        -> Result<Analytics, ApiError>;

    async fn realtime_metrics(&self, ctx: &AdminContext) -> Result<RealtimeMetrics, ApiError>;

    async fn export_report(
        &self,
        ctx: &AdminContext,
        export: &ReportExport,
    ) -> Result<ReportFile, ApiError>;

    /// Unauthenticated liveness probe.
    async fn health_check(&self) -> Result<(), ApiError>;
}

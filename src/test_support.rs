//! Shared fixtures for unit tests: literal helpers and an in-memory
//! marketplace backend.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use crate::api::pagination::PageInfo;
use crate::app::{create_app, AppState};
use crate::auth::AdminContext;
use crate::config::{Environment, Settings};
use crate::display::date_range::DateRange;
use crate::domain::{
    Analytics, Booking, BookingListQuery, DashboardStats, PriceCalculation,
    PriceCalculationRequest, PriceComparisonEntry, PriceComparisonRequest, ProductPrice,
    RealtimeMetrics, ReportExport, ReportFile,
};
use crate::error::ApiError;
use crate::services::{MarketplaceApi, Page};

pub const TEST_TOKEN: &str = "admin-token";

pub fn dec(raw: &str) -> Decimal {
    raw.parse().expect("valid decimal literal")
}

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid ISO date")
}

pub fn settings() -> Settings {
    Settings {
        env: Environment::Dev,
        server_addr: "127.0.0.1:0".to_string(),
        cors_allow_origins: vec!["http://localhost:3000".to_string()],
        backend_api_url: "http://backend.invalid".to_string(),
        backend_timeout_seconds: 5,
        fallback_currency: "USD".to_string(),
    }
}

/// Canned backend answers. Operations named in `failing` return an
/// upstream error instead.
#[derive(Default)]
pub struct StubMarketplace {
    pub bookings: Vec<Booking>,
    pub page_info: PageInfo,
    pub prices: Vec<ProductPrice>,
    pub calculation: PriceCalculation,
    pub comparison: Vec<PriceComparisonEntry>,
    pub stats: DashboardStats,
    pub analytics: Analytics,
    pub realtime: RealtimeMetrics,
    pub report: Option<ReportFile>,
    pub failing: Vec<&'static str>,

    pub tokens: Mutex<Vec<String>>,
    pub last_list_query: Mutex<Option<BookingListQuery>>,
    pub last_range: Mutex<Option<DateRange>>,
    pub last_export: Mutex<Option<ReportExport>>,
}

impl StubMarketplace {
    fn enter(&self, op: &'static str, ctx: &AdminContext) -> Result<(), ApiError> {
        self.tokens
            .lock()
            .expect("tokens lock")
            .push(ctx.token().to_string());
        if self.failing.contains(&op) {
            return Err(ApiError::Upstream(format!("{op} failed")));
        }
        Ok(())
    }
}

#[async_trait]
impl MarketplaceApi for StubMarketplace {
    async fn list_bookings(
        &self,
        ctx: &AdminContext,
        query: &BookingListQuery,
    ) -> Result<Page<Booking>, ApiError> {
        self.enter("list_bookings", ctx)?;
        *self.last_list_query.lock().expect("query lock") = Some(query.clone());
        Ok(Page {
            items: self.bookings.clone(),
            page_info: self.page_info.clone(),
        })
    }

    async fn get_booking(&self, ctx: &AdminContext, booking_id: &str) -> Result<Booking, ApiError> {
        self.enter("get_booking", ctx)?;
        self.bookings
            .iter()
            .find(|b| b.id == booking_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))
    }

    async fn list_product_prices(
        &self,
        ctx: &AdminContext,
        _product_id: &str,
    ) -> Result<Vec<ProductPrice>, ApiError> {
        self.enter("list_product_prices", ctx)?;
        Ok(self.prices.clone())
    }

    async fn calculate_price(
        &self,
        ctx: &AdminContext,
        _request: &PriceCalculationRequest,
    ) -> Result<PriceCalculation, ApiError> {
        self.enter("calculate_price", ctx)?;
        Ok(self.calculation.clone())
    }

    async fn compare_prices(
        &self,
        ctx: &AdminContext,
        _request: &PriceComparisonRequest,
    ) -> Result<Vec<PriceComparisonEntry>, ApiError> {
        self.enter("compare_prices", ctx)?;
        Ok(self.comparison.clone())
    }

    async fn dashboard_stats(&self, ctx: &AdminContext) -> Result<DashboardStats, ApiError> {
        self.enter("dashboard_stats", ctx)?;
        Ok(self.stats.clone())
    }

    async fn analytics(
        &self,
        ctx: &AdminContext,
        range: &DateRange,
    ) -> Result<Analytics, ApiError> {
        self.enter("analytics", ctx)?;
        *self.last_range.lock().expect("range lock") = Some(*range);
        Ok(self.analytics.clone())
    }

    async fn realtime_metrics(&self, ctx: &AdminContext) -> Result<RealtimeMetrics, ApiError> {
        self.enter("realtime_metrics", ctx)?;
        Ok(self.realtime.clone())
    }

    async fn export_report(
        &self,
        ctx: &AdminContext,
        export: &ReportExport,
    ) -> Result<ReportFile, ApiError> {
        self.enter("export_report", ctx)?;
        *self.last_export.lock().expect("export lock") = Some(export.clone());
        Ok(self.report.clone().unwrap_or(ReportFile {
            bytes: b"stub".to_vec(),
            content_type: None,
        }))
    }

    async fn health_check(&self) -> Result<(), ApiError> {
        if self.failing.contains(&"health_check") {
            return Err(ApiError::Upstream("backend down".to_string()));
        }
        Ok(())
    }
}

/// Router wired to `stub`, plus a handle for inspecting recorded calls.
pub fn app_with(stub: StubMarketplace) -> (Router, Arc<StubMarketplace>) {
    let stub = Arc::new(stub);
    let state = AppState::new(settings(), stub.clone());
    (create_app(state), stub)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
        .body(Body::empty())
        .expect("request")
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// Runs one request and decodes the JSON body (`Null` when empty or not JSON).
pub async fn call(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

//! HTTP client for the marketplace backend REST API.
//!
//! Every call forwards the admin's bearer token and, when known, the request
//! ID. Non-2xx answers are mapped onto [`ApiError`]; nothing is retried.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

use super::{MarketplaceApi, Page};
use crate::api::pagination::PageInfo;
use crate::auth::AdminContext;
use crate::display::date_range::DateRange;
use crate::domain::{
    Analytics, Booking, BookingListQuery, DashboardStats, PriceCalculation,
    PriceCalculationRequest, PriceComparisonEntry, PriceComparisonRequest, ProductPrice,
    RealtimeMetrics, ReportExport, ReportFile,
};
use crate::error::ApiError;
use crate::middleware::request_id::X_REQUEST_ID;

/// Client for the marketplace backend.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct BackendErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Most endpoints wrap their payload as `{ "data": ..., "pagination": ... }`,
/// a few answer with the bare payload.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped {
        data: T,
        #[serde(default)]
        pagination: Option<PageInfo>,
    },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_parts(self) -> (T, Option<PageInfo>) {
        match self {
            Self::Wrapped { data, pagination } => (data, pagination),
            Self::Bare(data) => (data, None),
        }
    }

    fn into_data(self) -> T {
        self.into_parts().0
    }
}

impl BackendClient {
    /// Create a new backend client.
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid backend URL: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Backend URL cannot carry a path: {base_url}");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(base_url = %base_url, "Backend client initialized");

        Ok(Self { client, base_url })
    }

    /// Base URL plus percent-encoded path segments and query pairs.
    fn url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Internal(anyhow::anyhow!("Backend URL cannot be a base")))?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        Ok(url)
    }

    async fn send(&self, req: RequestBuilder, ctx: &AdminContext) -> Result<Response, ApiError> {
        let mut req = req.bearer_auth(ctx.token());
        if let Some(rid) = ctx.request_id() {
            req = req.header(X_REQUEST_ID, rid);
        }

        let response = req.send().await.map_err(|e| {
            error!(error = %e, "Backend request failed");
            ApiError::Upstream(format!("backend unreachable: {e}"))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<BackendErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.message.or(body.error))
            .unwrap_or_else(|| format!("Backend error: {status}"));

        Err(map_status(status, message))
    }

    async fn get_json<R: DeserializeOwned>(
        &self,
        ctx: &AdminContext,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<R, ApiError> {
        let url = self.url(segments, query)?;
        debug!(url = %url, "Backend GET");

        let response = self.send(self.client.get(url), ctx).await?;
        decode(response).await
    }

    async fn post_json<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        ctx: &AdminContext,
        segments: &[&str],
        body: &T,
    ) -> Result<R, ApiError> {
        let url = self.url(segments, &[])?;
        debug!(url = %url, "Backend POST");

        let response = self.send(self.client.post(url).json(body), ctx).await?;
        decode(response).await
    }
}

async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ApiError> {
    let url = response.url().clone();
    response.json::<R>().await.map_err(|e| {
        error!(error = %e, url = %url, "Failed to parse backend response");
        ApiError::Upstream(format!("invalid backend response from {url}: {e}"))
    })
}

fn map_status(status: StatusCode, message: String) -> ApiError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY | StatusCode::CONFLICT => {
            ApiError::BadRequest(message)
        }
        StatusCode::UNAUTHORIZED => {
            ApiError::Unauthorized("Admin session is invalid or expired".to_string())
        }
        StatusCode::FORBIDDEN => ApiError::Forbidden(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        _ => {
            error!(status = %status, message = %message, "Backend error");
            ApiError::Upstream(format!("{status}: {message}"))
        }
    }
}

#[async_trait]
impl MarketplaceApi for BackendClient {
    // =========================================================================
    // Bookings
    // =========================================================================

    #[instrument(skip(self, ctx))]
    async fn list_bookings(
        &self,
        ctx: &AdminContext,
        query: &BookingListQuery,
    ) -> Result<Page<Booking>, ApiError> {
        let mut pairs = vec![
            ("page", query.page.to_string()),
            ("limit", query.per_page.to_string()),
        ];
        if let Some(status) = &query.status {
            pairs.push(("status", status.clone()));
        }
        if let Some(search) = &query.search {
            pairs.push(("search", search.clone()));
        }

        let envelope: Envelope<Vec<Booking>> =
            self.get_json(ctx, &["admin", "bookings"], &pairs).await?;
        let (items, page_info) = envelope.into_parts();

        Ok(Page {
            items,
            page_info: page_info.unwrap_or_default(),
        })
    }

    #[instrument(skip(self, ctx))]
    async fn get_booking(&self, ctx: &AdminContext, booking_id: &str) -> Result<Booking, ApiError> {
        let envelope: Envelope<Booking> = self
            .get_json(ctx, &["admin", "bookings", booking_id], &[])
            .await?;
        Ok(envelope.into_data())
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    #[instrument(skip(self, ctx))]
    async fn list_product_prices(
        &self,
        ctx: &AdminContext,
        product_id: &str,
    ) -> Result<Vec<ProductPrice>, ApiError> {
        let envelope: Envelope<Vec<ProductPrice>> = self
            .get_json(
                ctx,
                &["product-prices"],
                &[("product_id", product_id.to_string())],
            )
            .await?;
        Ok(envelope.into_data())
    }

    #[instrument(skip(self, ctx))]
    async fn calculate_price(
        &self,
        ctx: &AdminContext,
        request: &PriceCalculationRequest,
    ) -> Result<PriceCalculation, ApiError> {
        let envelope: Envelope<PriceCalculation> = self
            .post_json(ctx, &["product-prices", "calculate"], request)
            .await?;
        Ok(envelope.into_data())
    }

    #[instrument(skip(self, ctx))]
    async fn compare_prices(
        &self,
        ctx: &AdminContext,
        request: &PriceComparisonRequest,
    ) -> Result<Vec<PriceComparisonEntry>, ApiError> {
        let envelope: Envelope<Vec<PriceComparisonEntry>> = self
            .post_json(ctx, &["product-prices", "compare"], request)
            .await?;
        Ok(envelope.into_data())
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    async fn dashboard_stats(&self, ctx: &AdminContext) -> Result<DashboardStats, ApiError> {
        let envelope: Envelope<DashboardStats> =
            self.get_json(ctx, &["admin", "stats"], &[]).await?;
        Ok(envelope.into_data())
    }

    #[instrument(skip(self, ctx))]
    async fn analytics(
        &self,
        ctx: &AdminContext,
        range: &DateRange,
    ) -> Result<Analytics, ApiError> {
        let envelope: Envelope<Analytics> = self
            .get_json(
                ctx,
                &["admin", "analytics"],
                &[
                    ("start_date", range.start.format("%Y-%m-%d").to_string()),
                    ("end_date", range.end.format("%Y-%m-%d").to_string()),
                ],
            )
            .await?;
        Ok(envelope.into_data())
    }

    async fn realtime_metrics(&self, ctx: &AdminContext) -> Result<RealtimeMetrics, ApiError> {
        let envelope: Envelope<RealtimeMetrics> = self
            .get_json(ctx, &["admin", "realtime-metrics"], &[])
            .await?;
        Ok(envelope.into_data())
    }

    // =========================================================================
    // Reports
    // =========================================================================

    #[instrument(skip(self, ctx))]
    async fn export_report(
        &self,
        ctx: &AdminContext,
        export: &ReportExport,
    ) -> Result<ReportFile, ApiError> {
        let url = self.url(&["admin", "reports", "export"], &[])?;
        debug!(url = %url, "Backend report export");

        let response = self.send(self.client.post(url).json(export), ctx).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await.map_err(|e| {
            error!(error = %e, "Failed to read report body");
            ApiError::Upstream(format!("report download interrupted: {e}"))
        })?;

        Ok(ReportFile {
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    async fn health_check(&self) -> Result<(), ApiError> {
        let url = self.url(&["health"], &[])?;

        self.client
            .get(url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|e| ApiError::Upstream(format!("backend health check failed: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReportFormat;
    use crate::test_support::{date, dec};
    use axum::{
        extract::{Path, Query},
        http::HeaderMap,
        response::IntoResponse,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("test backend");
        });
        format!("http://{addr}/api/")
    }

    fn ctx() -> AdminContext {
        AdminContext::new("tok-123", Some("req-9".into()))
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer tok-123")
    }

    async fn list_bookings_handler(
        headers: HeaderMap,
        Query(query): Query<HashMap<String, String>>,
    ) -> axum::response::Response {
        if !authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "no" }))).into_response();
        }
        let request_id = headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        Json(json!({
            "success": true,
            "data": [{
                "id": 1,
                "status": query.get("status"),
                "booking_number": request_id,
                "pricing": { "subtotal": "80", "platformFee": 8 }
            }],
            "pagination": {
                "page": query.get("page"),
                "limit": query.get("limit"),
                "total": 1,
                "hasNext": false
            }
        }))
        .into_response()
    }

    async fn booking_handler(Path(id): Path<String>) -> axum::response::Response {
        match id.as_str() {
            "missing" => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "Booking not found" })),
            )
                .into_response(),
            "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "stack trace").into_response(),
            _ => Json(json!({ "id": id, "total_amount": "99.5" })).into_response(),
        }
    }

    async fn export_handler(Json(body): Json<serde_json::Value>) -> axum::response::Response {
        let csv = format!("report,{}\n", body["report_type"].as_str().unwrap_or_default());
        ([(CONTENT_TYPE, "text/csv")], csv).into_response()
    }

    fn backend_router() -> Router {
        Router::new()
            .route("/api/admin/bookings", get(list_bookings_handler))
            .route("/api/admin/bookings/:id", get(booking_handler))
            .route(
                "/api/admin/stats",
                get(|| async { Json(json!({ "totalUsers": 12, "total_revenue": "300.25" })) }),
            )
            .route("/api/admin/reports/export", post(export_handler))
            .route("/api/health", get(|| async { "ok" }))
    }

    #[tokio::test]
    async fn list_bookings_forwards_token_and_query() {
        let base = spawn_backend(backend_router()).await;
        let client = BackendClient::new(&base, 5).expect("client");

        let page = client
            .list_bookings(
                &ctx(),
                &BookingListQuery {
                    page: 3,
                    per_page: 25,
                    status: Some("pending".into()),
                    search: None,
                },
            )
            .await
            .expect("bookings");

        assert_eq!(page.items.len(), 1);
        let booking = &page.items[0];
        assert_eq!(booking.id, "1");
        assert_eq!(booking.status.as_deref(), Some("pending"));
        assert_eq!(booking.booking_number.as_deref(), Some("req-9"));
        assert_eq!(
            booking.pricing.as_ref().and_then(|p| p.platform_fee),
            Some(dec("8"))
        );
        assert_eq!(page.page_info.page, Some(3));
        assert_eq!(page.page_info.per_page, Some(25));
        assert_eq!(page.page_info.has_next, Some(false));
    }

    #[tokio::test]
    async fn backend_401_maps_to_unauthorized() {
        let base = spawn_backend(backend_router()).await;
        let client = BackendClient::new(&base, 5).expect("client");
        let stranger = AdminContext::new("other", None);

        let err = client
            .list_bookings(&stranger, &BookingListQuery::default())
            .await
            .expect_err("should be rejected");
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn bare_payloads_and_status_mapping() {
        let base = spawn_backend(backend_router()).await;
        let client = BackendClient::new(&base, 5).expect("client");

        let booking = client.get_booking(&ctx(), "b-7").await.expect("booking");
        assert_eq!(booking.id, "b-7");
        assert_eq!(booking.total_amount, Some(dec("99.5")));

        let stats = client.dashboard_stats(&ctx()).await.expect("stats");
        assert_eq!(stats.total_users, Some(12));
        assert_eq!(stats.total_revenue, Some(dec("300.25")));

        match client.get_booking(&ctx(), "missing").await {
            Err(ApiError::NotFound(message)) => assert_eq!(message, "Booking not found"),
            other => panic!("expected not found, got {other:?}"),
        }
        assert!(matches!(
            client.get_booking(&ctx(), "boom").await,
            Err(ApiError::Upstream(_))
        ));
    }

    #[tokio::test]
    async fn export_returns_bytes_and_content_type() {
        let base = spawn_backend(backend_router()).await;
        let client = BackendClient::new(&base, 5).expect("client");

        let file = client
            .export_report(
                &ctx(),
                &ReportExport {
                    report_type: "bookings".into(),
                    format: ReportFormat::Csv,
                    start_date: date("2024-05-01"),
                    end_date: date("2024-05-31"),
                },
            )
            .await
            .expect("export");

        assert_eq!(file.bytes, b"report,bookings\n".to_vec());
        assert_eq!(file.content_type.as_deref(), Some("text/csv"));
    }

    #[tokio::test]
    async fn unreachable_backend_is_an_upstream_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let client = BackendClient::new(&format!("http://{addr}"), 2).expect("client");
        assert!(matches!(
            client.dashboard_stats(&ctx()).await,
            Err(ApiError::Upstream(_))
        ));
        assert!(client.health_check().await.is_err());
    }

    #[tokio::test]
    async fn health_check_hits_health_endpoint() {
        let base = spawn_backend(backend_router()).await;
        let client = BackendClient::new(&base, 5).expect("client");
        assert!(client.health_check().await.is_ok());
    }

    #[test]
    fn url_encodes_segments_and_keeps_base_path() {
        let client = BackendClient::new("https://api.example.com/v1/", 5).expect("client");
        let url = client
            .url(&["admin", "bookings", "a/b c"], &[("q", "x&y".to_string())])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/admin/bookings/a%2Fb%20c?q=x%26y"
        );
    }
}

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: ServiceHealth,
}

#[derive(Serialize)]
pub struct ServiceHealth {
    pub marketplace_api: String,
}

/// Health check endpoint - public
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let backend_result = state.backend.health_check().await;

    if let Err(ref e) = backend_result {
        tracing::warn!(error = %e, "Marketplace backend health check failed");
    }

    let (status, status_code) = if backend_result.is_ok() {
        ("healthy", StatusCode::OK)
    } else {
        ("unhealthy", StatusCode::SERVICE_UNAVAILABLE)
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services: ServiceHealth {
                marketplace_api: if backend_result.is_ok() { "ok" } else { "error" }.to_string(),
            },
        }),
    )
}

#[cfg(test)]
mod tests {
    use crate::test_support::{app_with, call, StubMarketplace};
    use axum::{body::Body, http::Request};
    use axum::http::StatusCode;

    fn health_request() -> Request<Body> {
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn reports_healthy_without_a_token() {
        let (app, _) = app_with(StubMarketplace::default());

        let (status, body) = call(app, health_request()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["services"]["marketplace_api"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn backend_failure_is_unavailable() {
        let (app, _) = app_with(StubMarketplace {
            failing: vec!["health_check"],
            ..Default::default()
        });

        let (status, body) = call(app, health_request()).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["services"]["marketplace_api"], "error");
    }
}

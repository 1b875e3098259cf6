mod api;
mod app;
mod auth;
mod config;
mod display;
mod domain;
mod error;
mod logging;
mod middleware;
mod routes;
mod services;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::sync::Arc;

use services::{BackendClient, MarketplaceApi};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        backend = %settings.backend_api_url,
        "Starting rental admin service"
    );

    // Create marketplace backend client
    let backend = BackendClient::new(
        &settings.backend_api_url,
        settings.backend_timeout_seconds,
    )?;

    // Optionally check backend health (non-blocking)
    tokio::spawn({
        let backend = backend.clone();
        async move {
            match backend.health_check().await {
                Ok(()) => tracing::info!("Marketplace backend is healthy"),
                Err(e) => tracing::warn!(error = %e, "Marketplace backend health check failed - requests will fail until it recovers"),
            }
        }
    });

    // Create application state
    let state = app::AppState::new(settings.clone(), Arc::new(backend));

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

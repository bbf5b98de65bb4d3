//! # VoiceTrack API
//!
//! HTTP surface of the voice tracker: a health check for the hosting
//! platform plus read-only JSON views of the statistics the bot collects.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Read from the shared tracker and shape responses
//! - **Middleware**: Error mapping
//! - **Config**: Environment-driven server settings

/// Configuration module for API settings
pub mod config;
/// Request handlers that read tracker state
pub mod handlers;
/// Error handling shared by all handlers
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{http::HeaderValue, Router};
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use voicetrack_core::{points::FactionPoints, VoiceTracker};

/// Shared application state that is accessible to all request handlers
///
/// The tracker and points ledger are the same instances the Discord bot
/// writes to, so responses always reflect live data.
pub struct ApiState {
    pub tracker: Arc<VoiceTracker>,
    pub points: Arc<FactionPoints>,
}

/// All routes with state attached, without transport layers.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Statistics endpoints
        .merge(routes::stats::routes())
        .with_state(state)
}

/// The full application: routes plus tracing, timeout and optional CORS.
pub fn app(state: Arc<ApiState>, config: &config::ApiConfig) -> Router {
    let app = router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Apply CORS configuration if origins are specified
    match &config.cors_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin {}", origin);
                        None
                    }
                })
                .collect();
            app.layer(
                CorsLayer::new()
                    .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
                    .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::ACCEPT])
                    .allow_origin(origins),
            )
        }
        None => app,
    }
}

/// Starts the API server and serves until the listener fails.
pub async fn start_server(config: config::ApiConfig, state: Arc<ApiState>) -> Result<()> {
    let app = app(state, &config);

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

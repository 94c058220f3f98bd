//! HTTP adapters - REST API implementations.
//!
//! [`app_router`] assembles the full service: the marketplace API under
//! `/api`, a `/health` check, and the tower-http tracing, timeout and CORS
//! layers.

pub mod auth;
pub mod error;
pub mod marketplace;

pub use auth::{AuthenticatedUser, USER_ID_HEADER};
pub use error::{ApiError, ErrorResponse};
pub use marketplace::{marketplace_routes, MarketplaceAppState};

use axum::http::HeaderValue;
use axum::{routing::get, Json, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use marketplace::dto::HealthResponse;

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the complete application router.
pub fn app_router(state: MarketplaceAppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", marketplace_routes())
        .with_state(state)
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

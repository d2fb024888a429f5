//! HTTP adapters - REST API implementations.
//!
//! `app_router` assembles the full service: the sponsorship API under `/api`,
//! a health probe, and the auth, timeout, trace and CORS layers.

pub mod dto;
pub mod middleware;
pub mod sponsorship;

use std::time::Duration;

use axum::{routing::get, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use middleware::{auth_middleware, AuthState};
pub use sponsorship::{sponsorship_routes, SponsorshipAppState};

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Builds the application router.
pub fn app_router(
    state: SponsorshipAppState,
    auth: AuthState,
    request_timeout: Duration,
) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", sponsorship_routes().with_state(state))
        .layer(axum::middleware::from_fn_with_state(auth, auth_middleware))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

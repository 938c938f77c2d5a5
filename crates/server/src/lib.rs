//! JulieCraft storefront and admin API.
//!
//! The binary in `main.rs` wires configuration, Sentry, tracing and the
//! Postgres pool; everything a request touches lives in this library so the
//! integration tests can drive the same router against the in-memory backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

pub use backend::Backend;
pub use state::AppState;

/// Build the full application router.
///
/// Sentry layers are added by the binary on top of this so tests can run
/// without a Sentry client.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness check: 503 when no backend is configured or it cannot be reached.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    let Some(backend) = state.backend_opt() else {
        return StatusCode::SERVICE_UNAVAILABLE;
    };
    match backend.maintenance().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

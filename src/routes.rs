//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /links`      - Batch check (admitted)
//! - `POST /report`     - Link set retrieval (admitted)
//! - `GET  /link-sets`  - Administrative listing (admitted)
//! - `GET  /health`     - Lifecycle and store status (always answers)
//!
//! # Middleware
//!
//! - **Admission** - Rejects work with 503 once shutdown has begun
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{admission, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the routes and middleware without path normalization.
pub fn router(state: AppState) -> Router {
    let admitted = api::routes::admitted_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        admission::layer,
    ));

    Router::new()
        .merge(admitted)
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// Trailing slashes are trimmed before routing, so `/links/` reaches `/links`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

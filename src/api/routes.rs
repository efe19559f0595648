//! API route configuration.
//!
//! Every route here passes through lifecycle admission
//! ([`crate::api::middleware::admission`]) when mounted by
//! [`crate::routes::app_router`].

use crate::api::handlers::{check_handler, link_sets_handler, report_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes that perform work and are gated during shutdown.
///
/// # Endpoints
///
/// - `POST /links`      - Check a batch of links and store the result
/// - `POST /report`     - Retrieve stored link sets by identity
/// - `GET  /link-sets`  - List every stored link set
pub fn admitted_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(check_handler))
        .route("/report", post(report_handler))
        .route("/link-sets", get(link_sets_handler))
}

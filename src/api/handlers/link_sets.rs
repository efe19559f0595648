//! Handler for the administrative link set listing.

use axum::{Json, extract::State};

use crate::api::dto::link_sets::LinkSetListResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Lists every stored link set.
///
/// # Endpoint
///
/// `GET /link-sets`
pub async fn link_sets_handler(
    State(state): State<AppState>,
) -> Result<Json<LinkSetListResponse>, AppError> {
    let service = &state.link_set_service;
    let (link_sets, stats) = tokio::join!(service.list_link_sets(), service.store_stats());

    Ok(Json(LinkSetListResponse {
        total: link_sets.len(),
        next_id: stats.next_id,
        link_sets,
    }))
}

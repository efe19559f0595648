//! Handler for the batch check endpoint.

use axum::{Json, extract::State};
use serde_json::json;
use validator::Validate;

use crate::api::dto::check::{CheckRequest, CheckResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Checks a batch of links concurrently and stores the result as a new link set.
///
/// # Endpoint
///
/// `POST /links`
///
/// # Request Body
///
/// ```json
/// { "links": ["example.com", "#anchor", "https://bad.invalid"] }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "links": {
///     "#anchor": "not available",
///     "example.com": "available",
///     "https://bad.invalid": "not available"
///   },
///   "links_num": 1
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the batch is empty, contains an empty link, or
/// exceeds the configured maximum. Unreachable links are not errors.
pub async fn check_handler(
    State(state): State<AppState>,
    Json(payload): Json<CheckRequest>,
) -> Result<Json<CheckResponse>, AppError> {
    payload.validate()?;

    if payload.links.len() > state.max_links_per_request {
        return Err(AppError::bad_request(
            "Too many links in one request",
            json!({ "max": state.max_links_per_request, "got": payload.links.len() }),
        ));
    }

    let checked = state.link_set_service.check_links(payload.links).await?;

    Ok(Json(CheckResponse {
        links: checked.links,
        links_num: checked.id,
    }))
}

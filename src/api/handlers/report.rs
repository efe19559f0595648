//! Handler for link set retrieval.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};
use validator::Validate;

use crate::api::dto::report::{ReportRequest, ReportResponse};
use crate::error::AppError;
use crate::infrastructure::report;
use crate::state::AppState;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const PDF_DISPOSITION: &str = "attachment; filename=link_report.pdf";

/// Returns previously stored link sets for report generation.
///
/// # Endpoint
///
/// `POST /report`
///
/// # Request Body
///
/// ```json
/// { "links_list": [1, 2, 42] }
/// ```
///
/// Identities that do not exist are left out of the response.
///
/// # Formats
///
/// JSON by default. With `Accept: application/pdf` the same link sets are
/// rendered as a downloadable `link_report.pdf`.
///
/// # Errors
///
/// - 400 Bad Request if `links_list` is empty
/// - 404 Not Found if none of the identities exist
/// - 500 Internal Server Error if the PDF cannot be rendered
pub async fn report_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ReportRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let link_sets = state
        .link_set_service
        .get_link_sets(&payload.links_list)
        .await?;

    if !wants_pdf(&headers) {
        return Ok(Json(ReportResponse { link_sets }).into_response());
    }

    let pdf = report::render_pdf(link_sets).await?;
    tracing::debug!(bytes = pdf.len(), "Rendered PDF report");

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(PDF_CONTENT_TYPE)),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_static(PDF_DISPOSITION),
            ),
        ],
        pdf,
    )
        .into_response())
}

fn wants_pdf(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|media| {
            media
                .split(';')
                .next()
                .is_some_and(|kind| kind.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        })
}

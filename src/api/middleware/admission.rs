//! Lifecycle admission middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Admits requests while the service is accepting work.
///
/// # Admission Flow
///
/// 1. Atomically check the lifecycle phase and count the request as in flight
/// 2. Run the rest of the stack while holding the in-flight guard
/// 3. Release the guard when the response is produced, on every exit path
///
/// # Errors
///
/// Returns `503 Service Unavailable` once shutdown has begun. Rejected
/// requests are never counted as in flight.
///
/// # Example
///
/// ```rust,ignore
/// let admitted = Router::new()
///     .route("/links", post(check_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), admission::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(_guard) = st.lifecycle.try_admit() else {
        tracing::debug!(path = %req.uri().path(), "Rejected request while draining");
        return Err(AppError::service_unavailable(
            "Server is shutting down",
            json!({ "phase": st.lifecycle.phase().as_str() }),
        ));
    };

    Ok(next.run(req).await)
}

//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{HealthChecks, HealthResponse, LifecycleCheck, StoreCheck};
use crate::state::AppState;

/// Returns service health with lifecycle and store details.
///
/// # Endpoint
///
/// `GET /health`
///
/// Not subject to lifecycle admission, so it keeps answering while draining.
///
/// # Response Codes
///
/// - **200 OK**: Accepting requests
/// - **503 Service Unavailable**: Draining or stopped
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "lifecycle": { "status": "ok", "phase": "accepting", "in_flight": 2 },
///     "store": { "status": "ok", "link_sets": 14, "next_id": 15 }
///   }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let accepting = state.lifecycle.is_accepting();
    let stats = state.link_set_service.store_stats().await;

    let response = HealthResponse {
        status: if accepting { "healthy" } else { "draining" },
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks {
            lifecycle: LifecycleCheck {
                status: if accepting { "ok" } else { "unavailable" },
                phase: state.lifecycle.phase().as_str(),
                in_flight: state.lifecycle.in_flight(),
            },
            store: StoreCheck {
                status: "ok",
                link_sets: stats.link_sets,
                next_id: stats.next_id,
            },
        },
    };

    let code = if accepting {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(response))
}

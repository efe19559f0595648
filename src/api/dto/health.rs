//! DTOs for health check endpoint.

use serde::Serialize;

use crate::domain::entities::LinkSetId;

/// Health check response with component status.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` while accepting, `draining` afterwards.
    pub status: &'static str,
    pub version: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub lifecycle: LifecycleCheck,
    pub store: StoreCheck,
}

#[derive(Debug, Serialize)]
pub struct LifecycleCheck {
    pub status: &'static str,
    pub phase: &'static str,
    pub in_flight: usize,
}

#[derive(Debug, Serialize)]
pub struct StoreCheck {
    pub status: &'static str,
    pub link_sets: usize,
    pub next_id: LinkSetId,
}

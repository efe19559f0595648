//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::LinkSetService;
use crate::domain::lifecycle::Lifecycle;
use crate::infrastructure::persistence::SnapshotStore;
use crate::infrastructure::probe::HttpProber;

/// Link set service wired to the production prober and store.
pub type DefaultLinkSetService = LinkSetService<HttpProber, SnapshotStore>;

#[derive(Clone)]
pub struct AppState {
    pub link_set_service: Arc<DefaultLinkSetService>,
    pub lifecycle: Arc<Lifecycle>,
    /// Upper bound on links accepted in one check request.
    pub max_links_per_request: usize,
}

impl AppState {
    pub fn new(
        link_set_service: Arc<DefaultLinkSetService>,
        lifecycle: Arc<Lifecycle>,
        max_links_per_request: usize,
    ) -> Self {
        Self {
            link_set_service,
            lifecycle,
            max_links_per_request,
        }
    }
}

//! Port for checking a single URL.

use crate::domain::entities::LinkStatus;
use async_trait::async_trait;
use tokio::time::Instant;

/// Performs one availability check for one URL.
///
/// The URL passed in is already normalized (see
/// [`crate::utils::url_normalizer::normalize_probe_target`]). Implementations
/// must never fail: every network, protocol or timeout error is reported as
/// [`LinkStatus::NotAvailable`]. No retries.
///
/// # Implementations
///
/// - [`crate::infrastructure::probe::HttpProber`] - single GET via `reqwest`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probes `url`, giving up at `deadline`.
    async fn probe(&self, url: &str, deadline: Instant) -> LinkStatus;
}

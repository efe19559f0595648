//! HTTP prober using a pooled `reqwest` client.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::time::Instant;

use crate::domain::entities::LinkStatus;
use crate::domain::repositories::Prober;
use crate::utils::url_normalizer::parse_probe_url;

/// Tunables for [`HttpProber`].
#[derive(Debug, Clone)]
pub struct ProberSettings {
    /// Upper bound for a single probe, independent of the batch deadline.
    pub timeout: Duration,
    /// Idle pooled connections kept per host.
    pub pool_max_idle_per_host: usize,
    /// Maximum redirect hops followed before giving up.
    pub max_redirects: usize,
}

impl Default for ProberSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 10,
            max_redirects: 10,
        }
    }
}

/// Checks a URL with one GET request.
///
/// # Classification
///
/// - Response with status < 400 → [`LinkStatus::Available`]
/// - Response with status ≥ 400 → [`LinkStatus::NotAvailable`]
/// - Anchor, malformed URL, connect/TLS/protocol error, timeout → [`LinkStatus::NotAvailable`]
///
/// # Cancellation
///
/// A probe is bounded by `min(settings.timeout, deadline)`. The batch deadline
/// is enforced with `tokio::time::timeout_at`, so an expired deadline abandons
/// a request that is already in flight. The response body is never read.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    /// Builds the shared client.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(settings: &ProberSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .pool_max_idle_per_host(settings.pool_max_idle_per_host)
            .redirect(reqwest::redirect::Policy::limited(settings.max_redirects))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str, deadline: Instant) -> LinkStatus {
        let target = match parse_probe_url(url) {
            Ok(target) => target,
            Err(e) => {
                tracing::debug!(url, reason = %e, "Probe target rejected");
                return LinkStatus::NotAvailable;
            }
        };

        match tokio::time::timeout_at(deadline, self.client.get(target).send()).await {
            Ok(Ok(response)) => {
                let status = LinkStatus::from_http_status(response.status().as_u16());
                tracing::debug!(url, http_status = response.status().as_u16(), %status, "Probe finished");
                status
            }
            Ok(Err(e)) => {
                tracing::debug!(url, error = %e, timeout = e.is_timeout(), "Probe failed");
                LinkStatus::NotAvailable
            }
            Err(_) => {
                tracing::debug!(url, "Probe abandoned at batch deadline");
                LinkStatus::NotAvailable
            }
        }
    }
}

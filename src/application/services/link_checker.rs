//! Concurrent batch checking.

use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::domain::entities::{LinkStatus, LinkStatuses};
use crate::domain::repositories::Prober;
use crate::utils::url_normalizer::normalize_probe_target;

/// Fans a batch of URLs out to concurrent probes and joins the results.
///
/// One tokio task per distinct URL; duplicates in the input are probed once.
/// Results are collected through the [`JoinSet`] and merged on the calling
/// task, so there is no shared mutable map.
pub struct LinkChecker<P: Prober> {
    prober: Arc<P>,
}

impl<P: Prober> Clone for LinkChecker<P> {
    fn clone(&self) -> Self {
        Self {
            prober: Arc::clone(&self.prober),
        }
    }
}

impl<P: Prober + 'static> LinkChecker<P> {
    /// Creates a new checker around a shared prober.
    pub fn new(prober: Arc<P>) -> Self {
        Self { prober }
    }

    /// Checks every URL and returns exactly one entry per distinct input URL.
    ///
    /// Keys are the URLs as submitted; the prober receives the normalized
    /// form. A task that finds `deadline` already passed records
    /// [`LinkStatus::NotAvailable`] without touching the network. Returns only
    /// after every task has finished, so callers never see a partial map.
    pub async fn check_all(&self, urls: &[String], deadline: Instant) -> LinkStatuses {
        let distinct: BTreeSet<&str> = urls.iter().map(String::as_str).collect();

        let mut tasks = JoinSet::new();
        for url in distinct {
            let prober = Arc::clone(&self.prober);
            let url = url.to_string();

            tasks.spawn(async move {
                if Instant::now() >= deadline {
                    return (url, LinkStatus::NotAvailable);
                }

                let status = {
                    let target = normalize_probe_target(&url);
                    prober.probe(&target, deadline).await
                };
                (url, status)
            });
        }

        let mut results = LinkStatuses::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((url, status)) => {
                    results.insert(url, status);
                }
                Err(e) => tracing::warn!(error = %e, "Probe task did not complete"),
            }
        }

        // A panicked task loses its key; report it rather than omit it.
        for url in urls {
            results
                .entry(url.clone())
                .or_insert(LinkStatus::NotAvailable);
        }

        results
    }
}

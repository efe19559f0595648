//! Link set checking, recording and retrieval service.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::application::services::LinkChecker;
use crate::domain::entities::{LinkSet, LinkSetId, LinkStatuses};
use crate::domain::repositories::{LinkSetRepository, Prober, StoreStats};
use crate::error::AppError;
use serde_json::json;

/// Result of a recorded batch check.
#[derive(Debug, Clone)]
pub struct CheckedLinkSet {
    pub id: LinkSetId,
    pub links: LinkStatuses,
}

/// Service for checking batches of links and reading back stored link sets.
///
/// A check runs every probe under one deadline (`check_timeout` from the
/// moment the request is handled), then records the result as a new link set.
pub struct LinkSetService<P: Prober, R: LinkSetRepository> {
    checker: LinkChecker<P>,
    repository: Arc<R>,
    check_timeout: Duration,
}

impl<P: Prober + 'static, R: LinkSetRepository> LinkSetService<P, R> {
    /// Creates a new link set service.
    pub fn new(prober: Arc<P>, repository: Arc<R>, check_timeout: Duration) -> Self {
        Self {
            checker: LinkChecker::new(prober),
            repository,
            check_timeout,
        }
    }

    /// Checks all `urls` concurrently and records the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the batch is empty or contains an
    /// empty URL. Probe failures are never errors; they appear as
    /// `not available` in the result.
    pub async fn check_links(&self, urls: Vec<String>) -> Result<CheckedLinkSet, AppError> {
        if urls.is_empty() {
            return Err(AppError::bad_request("No links provided", json!({})));
        }
        if let Some(position) = urls.iter().position(|u| u.trim().is_empty()) {
            return Err(AppError::bad_request(
                "Links must not be empty",
                json!({ "index": position }),
            ));
        }

        let started = Instant::now();
        let deadline = started + self.check_timeout;
        let links = self.checker.check_all(&urls, deadline).await;
        let id = self.repository.save(links.clone()).await;

        let available = links.values().filter(|s| s.is_available()).count();
        tracing::info!(
            link_set = id,
            total = links.len(),
            available,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Link set checked"
        );

        Ok(CheckedLinkSet { id, links })
    }

    /// Retrieves the link sets with the given identities.
    ///
    /// Unknown identities are silently omitted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `ids` is empty and
    /// [`AppError::NotFound`] if none of the identities exist.
    pub async fn get_link_sets(
        &self,
        ids: &[LinkSetId],
    ) -> Result<BTreeMap<LinkSetId, LinkSet>, AppError> {
        if ids.is_empty() {
            return Err(AppError::bad_request("No links list provided", json!({})));
        }

        let found = self.repository.get_many(ids).await;
        if found.is_empty() {
            return Err(AppError::not_found(
                "No data found for provided links numbers",
                json!({ "links_list": ids }),
            ));
        }

        Ok(found)
    }

    /// Returns every stored link set.
    pub async fn list_link_sets(&self) -> BTreeMap<LinkSetId, LinkSet> {
        self.repository.get_all().await
    }

    /// Returns store size information.
    pub async fn store_stats(&self) -> StoreStats {
        self.repository.stats().await
    }
}

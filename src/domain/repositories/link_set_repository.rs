//! Repository trait for link set storage.

use crate::domain::entities::{LinkSet, LinkSetId, LinkStatuses};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Size of the store, reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub link_sets: usize,
    pub next_id: LinkSetId,
}

/// Repository interface for numbered link sets.
///
/// The repository exclusively owns every [`LinkSet`]; all read methods hand
/// out clones.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SnapshotStore`] - in-memory map with JSON snapshots
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkSetRepository: Send + Sync {
    /// Records a new link set and returns its identity.
    ///
    /// Identities are unique and strictly increasing across concurrent callers.
    /// Durability is best-effort: the snapshot write is scheduled, not awaited,
    /// and its failure never fails this call.
    async fn save(&self, links: LinkStatuses) -> LinkSetId;

    /// Returns the requested link sets. Unknown identities are omitted.
    async fn get_many(&self, ids: &[LinkSetId]) -> BTreeMap<LinkSetId, LinkSet>;

    /// Returns every stored link set.
    async fn get_all(&self) -> BTreeMap<LinkSetId, LinkSet>;

    /// Returns the number of stored sets and the next identity to assign.
    async fn stats(&self) -> StoreStats;
}

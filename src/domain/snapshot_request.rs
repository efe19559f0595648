//! Requests consumed by the snapshot writer.

use crate::domain::entities::LinkSetId;
use crate::error::StoreError;
use tokio::sync::oneshot;

/// A unit of work for the single snapshot writer.
///
/// Requests are processed strictly in the order they were queued. Each save
/// enqueues a `Persist` while still holding the store's write lock, so queue
/// order matches version order.
///
/// # Usage Flow
///
/// 1. [`crate::infrastructure::persistence::SnapshotStore`] records a link set
/// 2. A `Persist` carrying the post-save version is sent (non-blocking)
/// 3. [`crate::infrastructure::persistence::run_snapshot_worker`] writes the
///    latest full state, skipping versions that are already durable
#[derive(Debug)]
pub enum SnapshotRequest {
    /// Make the state as of `version` durable. The writer may write a newer state.
    Persist { version: LinkSetId },

    /// Barrier: reply once everything queued before it is durable.
    Flush {
        version: LinkSetId,
        reply: oneshot::Sender<Result<(), StoreError>>,
    },
}

impl SnapshotRequest {
    /// Version this request needs to be durable.
    pub fn version(&self) -> LinkSetId {
        match self {
            Self::Persist { version } | Self::Flush { version, .. } => *version,
        }
    }
}

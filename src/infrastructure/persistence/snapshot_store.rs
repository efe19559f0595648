//! In-memory link set store backed by JSON snapshots.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc, oneshot};

use crate::domain::entities::{LinkSet, LinkSetId, LinkStatuses};
use crate::domain::repositories::{LinkSetRepository, StoreStats};
use crate::domain::snapshot_request::SnapshotRequest;
use crate::error::StoreError;
use crate::infrastructure::persistence::snapshot_file::{Snapshot, SnapshotFile};
use crate::infrastructure::persistence::snapshot_worker::run_snapshot_worker;

/// Link set repository holding all state in memory.
///
/// Reads share a `tokio::sync::RwLock`; a save takes the write lock, so
/// identity assignment is strictly ordered and never duplicated. Every save
/// queues a persist request for the [`SnapshotWorker`] without waiting for it.
pub struct SnapshotStore {
    state: Arc<RwLock<Snapshot>>,
    requests: mpsc::UnboundedSender<SnapshotRequest>,
}

/// The store's single writer. Must be spawned for saves to become durable.
pub struct SnapshotWorker {
    rx: mpsc::UnboundedReceiver<SnapshotRequest>,
    state: Arc<RwLock<Snapshot>>,
    file: SnapshotFile,
    write_attempts: usize,
    durable_version: LinkSetId,
}

impl SnapshotWorker {
    /// Processes snapshot requests until the store is dropped.
    pub async fn run(self) {
        run_snapshot_worker(
            self.rx,
            self.state,
            self.file,
            self.write_attempts,
            self.durable_version,
        )
        .await
    }
}

impl SnapshotStore {
    /// Loads the previous snapshot (if any) and returns the store with its writer.
    ///
    /// A missing or unreadable snapshot is not an error: the store starts
    /// empty with the identity counter at 1.
    pub async fn open(file: SnapshotFile, write_attempts: usize) -> (Self, SnapshotWorker) {
        let snapshot = load_or_empty(&file).await;
        Self::from_snapshot(snapshot, file, write_attempts)
    }

    /// Builds a store around an already-loaded snapshot.
    pub fn from_snapshot(
        snapshot: Snapshot,
        file: SnapshotFile,
        write_attempts: usize,
    ) -> (Self, SnapshotWorker) {
        let durable_version = snapshot.next_id;
        let state = Arc::new(RwLock::new(snapshot));
        let (tx, rx) = mpsc::unbounded_channel();

        let store = Self {
            state: state.clone(),
            requests: tx,
        };
        let worker = SnapshotWorker {
            rx,
            state,
            file,
            write_attempts: write_attempts.max(1),
            durable_version,
        };

        (store, worker)
    }

    /// Waits until the state as of this call is durable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::WriterClosed`] if the worker is not running and
    /// [`StoreError::WriteFailed`] if the write failed after all attempts.
    pub async fn flush(&self) -> Result<(), StoreError> {
        let (reply, done) = oneshot::channel();
        {
            let state = self.state.read().await;
            self.requests
                .send(SnapshotRequest::Flush {
                    version: state.next_id,
                    reply,
                })
                .map_err(|_| StoreError::WriterClosed)?;
        }

        done.await.map_err(|_| StoreError::WriterClosed)?
    }

    /// Returns a copy of the complete current state.
    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.clone()
    }
}

#[async_trait]
impl LinkSetRepository for SnapshotStore {
    async fn save(&self, links: LinkStatuses) -> LinkSetId {
        let mut state = self.state.write().await;

        let id = state.next_id;
        state
            .link_sets
            .insert(id, LinkSet::new(id, links, Utc::now()));
        state.next_id += 1;

        // Sent under the write lock so queue order matches version order.
        if self
            .requests
            .send(SnapshotRequest::Persist {
                version: state.next_id,
            })
            .is_err()
        {
            tracing::warn!(id, "Snapshot worker is not running; link set kept in memory only");
        }

        id
    }

    async fn get_many(&self, ids: &[LinkSetId]) -> BTreeMap<LinkSetId, LinkSet> {
        let state = self.state.read().await;
        ids.iter()
            .filter_map(|id| state.link_sets.get(id).map(|set| (*id, set.clone())))
            .collect()
    }

    async fn get_all(&self) -> BTreeMap<LinkSetId, LinkSet> {
        self.state.read().await.link_sets.clone()
    }

    async fn stats(&self) -> StoreStats {
        let state = self.state.read().await;
        StoreStats {
            link_sets: state.link_sets.len(),
            next_id: state.next_id,
        }
    }
}

/// Loads a snapshot, degrading to an empty one on absence or corruption.
pub async fn load_or_empty(file: &SnapshotFile) -> Snapshot {
    match file.load().await {
        Ok(Some(mut snapshot)) => {
            if snapshot.repair_next_id() {
                tracing::warn!(
                    next_id = snapshot.next_id,
                    "Snapshot next id was below stored identities; repaired"
                );
            }
            tracing::info!(
                link_sets = snapshot.link_sets.len(),
                next_id = snapshot.next_id,
                path = %file.path().display(),
                "Loaded link set snapshot"
            );
            snapshot
        }
        Ok(None) => {
            tracing::info!(
                path = %file.path().display(),
                "No snapshot found, starting with an empty store"
            );
            Snapshot::default()
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %file.path().display(),
                "Failed to load snapshot, starting with an empty store"
            );
            Snapshot::default()
        }
    }
}

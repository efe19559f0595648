//! Single background writer for link set snapshots.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, mpsc};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::entities::LinkSetId;
use crate::domain::snapshot_request::SnapshotRequest;
use crate::error::StoreError;
use crate::infrastructure::persistence::snapshot_file::{Snapshot, SnapshotFile, encode};

/// Background worker that makes link set state durable.
///
/// The only task that ever writes the snapshot file. Requests are handled in
/// queue order; everything already queued is coalesced into one write of the
/// latest full state. Versions at or below `durable_version` are skipped.
///
/// A failed write is retried with jittered exponential backoff up to
/// `write_attempts` times, then logged. Pending flushes receive the error.
/// The worker exits once every [`crate::infrastructure::persistence::SnapshotStore`]
/// handle has been dropped and the queue is empty.
pub async fn run_snapshot_worker(
    mut rx: mpsc::UnboundedReceiver<SnapshotRequest>,
    state: Arc<RwLock<Snapshot>>,
    file: SnapshotFile,
    write_attempts: usize,
    mut durable_version: LinkSetId,
) {
    while let Some(first) = rx.recv().await {
        let mut batch = vec![first];
        while let Ok(next) = rx.try_recv() {
            batch.push(next);
        }

        let wanted = batch
            .iter()
            .map(SnapshotRequest::version)
            .max()
            .unwrap_or(durable_version);

        let mut failure = None;
        if wanted > durable_version {
            match write_latest(&state, &file, write_attempts).await {
                Ok(written) => {
                    tracing::debug!(
                        version = written,
                        path = %file.path().display(),
                        "Snapshot written"
                    );
                    durable_version = written;
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        path = %file.path().display(),
                        "Failed to write snapshot; in-memory state is unaffected"
                    );
                    failure = Some(e.to_string());
                }
            }
        }

        // A flush fails only if its own version is still not on disk.
        for request in batch {
            if let SnapshotRequest::Flush { version, reply } = request {
                let result = match &failure {
                    Some(message) if version > durable_version => {
                        Err(StoreError::WriteFailed(message.clone()))
                    }
                    _ => Ok(()),
                };
                let _ = reply.send(result);
            }
        }
    }

    tracing::debug!("Snapshot worker stopped");
}

/// Captures the current state under a read lock and writes it atomically.
///
/// Returns the version that is now durable.
async fn write_latest(
    state: &RwLock<Snapshot>,
    file: &SnapshotFile,
    write_attempts: usize,
) -> Result<LinkSetId, StoreError> {
    let (version, data) = {
        let snapshot = state.read().await;
        (snapshot.next_id, encode(&snapshot)?)
    };

    let retries = ExponentialBackoff::from_millis(2)
        .factor(25)
        .max_delay(Duration::from_secs(2))
        .map(jitter)
        .take(write_attempts.saturating_sub(1));

    let data = &data;
    Retry::spawn(retries, move || async move {
        file.write_atomic(data).await.inspect_err(|e| {
            tracing::warn!(error = %e, version, "Snapshot write attempt failed");
        })
    })
    .await?;

    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{LinkSet, LinkStatus, LinkStatuses};
    use chrono::Utc;
    use tempfile::TempDir;
    use tokio::sync::oneshot;

    fn state_with(ids: &[LinkSetId]) -> Arc<RwLock<Snapshot>> {
        let mut snapshot = Snapshot::default();
        for &id in ids {
            let mut links = LinkStatuses::new();
            links.insert(format!("site{id}.example"), LinkStatus::Available);
            snapshot.link_sets.insert(id, LinkSet::new(id, links, Utc::now()));
            snapshot.next_id = id + 1;
        }
        Arc::new(RwLock::new(snapshot))
    }

    #[tokio::test]
    async fn test_persist_then_flush_writes_latest_state() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("links.json"));
        let state = state_with(&[1, 2, 3]);
        let (tx, rx) = mpsc::unbounded_channel();

        let worker = tokio::spawn(run_snapshot_worker(
            rx,
            state.clone(),
            file.clone(),
            1,
            1,
        ));

        tx.send(SnapshotRequest::Persist { version: 2 }).unwrap();
        let (reply, done) = oneshot::channel();
        tx.send(SnapshotRequest::Flush { version: 4, reply }).unwrap();
        done.await.unwrap().unwrap();

        let on_disk = file.load().await.unwrap().unwrap();
        assert_eq!(on_disk, *state.read().await);

        drop(tx);
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_flush_with_nothing_pending_skips_write() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("links.json"));
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(run_snapshot_worker(rx, state_with(&[]), file.clone(), 1, 1));

        let (reply, done) = oneshot::channel();
        tx.send(SnapshotRequest::Flush { version: 1, reply }).unwrap();
        done.await.unwrap().unwrap();

        assert!(!file.path().exists());
    }

    #[tokio::test]
    async fn test_write_failure_reported_to_flush() {
        let dir = TempDir::new().unwrap();
        // A directory at the target path makes the final rename fail.
        let target = dir.path().join("links.json");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), b"x").unwrap();
        let file = SnapshotFile::new(target);
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(run_snapshot_worker(rx, state_with(&[1]), file, 2, 1));

        let (reply, done) = oneshot::channel();
        tx.send(SnapshotRequest::Flush { version: 2, reply }).unwrap();
        let result = done.await.unwrap();

        assert!(matches!(result, Err(StoreError::WriteFailed(_))));
    }

    #[tokio::test]
    async fn test_failed_newer_write_does_not_fail_durable_flush() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("links.json");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), b"x").unwrap();
        let file = SnapshotFile::new(target);
        let (tx, rx) = mpsc::unbounded_channel();

        // Version 2 is already durable; state has moved on to 3.
        tokio::spawn(run_snapshot_worker(rx, state_with(&[1, 2]), file, 1, 2));

        let (old_reply, old_done) = oneshot::channel();
        let (new_reply, new_done) = oneshot::channel();
        tx.send(SnapshotRequest::Flush {
            version: 2,
            reply: old_reply,
        })
        .unwrap();
        tx.send(SnapshotRequest::Persist { version: 3 }).unwrap();
        tx.send(SnapshotRequest::Flush {
            version: 3,
            reply: new_reply,
        })
        .unwrap();

        assert!(old_done.await.unwrap().is_ok());
        assert!(matches!(
            new_done.await.unwrap(),
            Err(StoreError::WriteFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_worker_stops_when_senders_dropped() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("links.json"));
        let (tx, rx) = mpsc::unbounded_channel();

        let worker = tokio::spawn(run_snapshot_worker(rx, state_with(&[1]), file.clone(), 1, 1));
        tx.send(SnapshotRequest::Persist { version: 2 }).unwrap();
        drop(tx);

        worker.await.unwrap();
        assert!(file.path().exists());
    }
}

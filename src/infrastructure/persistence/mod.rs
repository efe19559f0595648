//! Link set persistence.
//!
//! Link sets live in memory behind a read/write lock and are made durable as
//! whole-state JSON snapshots. A single background worker performs every
//! file write, so writes never interleave.
//!
//! - [`SnapshotStore`] - [`crate::domain::repositories::LinkSetRepository`] implementation
//! - [`SnapshotFile`] - Atomic write-then-rename snapshot file
//! - [`run_snapshot_worker`] - The single sequential writer

pub mod snapshot_file;
pub mod snapshot_store;
pub mod snapshot_worker;

pub use snapshot_file::{Snapshot, SnapshotFile};
pub use snapshot_store::{SnapshotStore, SnapshotWorker, load_or_empty};
pub use snapshot_worker::run_snapshot_worker;

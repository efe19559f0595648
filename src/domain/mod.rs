//! Domain layer containing business entities and contracts.
//!
//! Defines link set entities, the repository and prober traits implemented
//! by the infrastructure layer, and the request lifecycle gate.
//!
//! # Architecture
//!
//! - [`entities`] - Link sets and link statuses
//! - [`repositories`] - Storage and probing trait definitions
//! - [`lifecycle`] - Admission control and graceful drain
//! - [`snapshot_request`] - Messages consumed by the snapshot writer
//!
//! # Persistence Flow
//!
//! 1. A checked batch is saved through [`repositories::LinkSetRepository`]
//! 2. The store queues a [`snapshot_request::SnapshotRequest`]
//! 3. A single background writer coalesces requests into atomic file writes

pub mod entities;
pub mod lifecycle;
pub mod repositories;
pub mod snapshot_request;

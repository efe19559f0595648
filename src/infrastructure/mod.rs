//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - In-memory link set store with crash-safe JSON snapshots
//! - [`probe`] - HTTP implementation of the probe port
//! - [`report`] - PDF rendering of stored link sets

pub mod persistence;
pub mod probe;
pub mod report;

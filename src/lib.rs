//! # Link Status
//!
//! A concurrent link availability checker built with Axum. Batches of URLs are
//! probed in parallel under a shared deadline, each result is recorded as a
//! numbered link set, and link sets survive restarts through crash-safe JSON
//! snapshots.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Link set entities, repository traits, lifecycle gate
//! - **Application Layer** ([`application`]) - Batch checking and link set retrieval
//! - **Infrastructure Layer** ([`infrastructure`]) - Snapshot store and HTTP prober
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//!
//! ## Quick Start
//!
//! ```bash
//! export STORAGE_FILE="link_sets.json"
//! cargo run
//!
//! curl -X POST localhost:8080/links -H 'content-type: application/json' \
//!      -d '{"links": ["example.com", "https://rust-lang.org"]}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkChecker, LinkSetService};
    pub use crate::domain::entities::{LinkSet, LinkSetId, LinkStatus, LinkStatuses};
    pub use crate::domain::lifecycle::{DrainOutcome, Lifecycle};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}

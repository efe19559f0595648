//! Repository and port trait definitions for the domain layer.
//!
//! These traits are implemented in `crate::infrastructure`; mock
//! implementations are generated via `mockall` for testing.
//!
//! - [`LinkSetRepository`] - Link set storage with identity assignment
//! - [`Prober`] - Single-URL availability check

pub mod link_set_repository;
pub mod prober;

pub use link_set_repository::{LinkSetRepository, StoreStats};
pub use prober::Prober;

#[cfg(test)]
pub use link_set_repository::MockLinkSetRepository;
#[cfg(test)]
pub use prober::MockProber;

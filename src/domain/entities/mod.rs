//! Core domain entities.
//!
//! - [`LinkSet`] - A numbered, timestamped batch of URL availability results
//! - [`LinkStatus`] - The two-valued availability vocabulary

pub mod link_set;

pub use link_set::{LinkSet, LinkSetId, LinkStatus, LinkStatuses};

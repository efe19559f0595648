//! Business logic services for the application layer.

pub mod link_checker;
pub mod link_set_service;

pub use link_checker::LinkChecker;
pub use link_set_service::{CheckedLinkSet, LinkSetService};

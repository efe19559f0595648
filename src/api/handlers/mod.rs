//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod check;
pub mod health;
pub mod link_sets;
pub mod report;

pub use check::check_handler;
pub use health::health_handler;
pub use link_sets::link_sets_handler;
pub use report::report_handler;

//! Application layer services implementing business logic.
//!
//! Services coordinate the probe port and the link set repository and give
//! HTTP handlers a small API.
//!
//! # Available Services
//!
//! - [`services::link_checker::LinkChecker`] - Concurrent fan-out of probes over a batch
//! - [`services::link_set_service::LinkSetService`] - Check-and-record, retrieval, listing

pub mod services;

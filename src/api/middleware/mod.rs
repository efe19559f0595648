//! HTTP middleware for request processing.
//!
//! Provides lifecycle admission and observability middleware.

pub mod admission;
pub mod tracing;

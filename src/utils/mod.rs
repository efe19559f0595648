//! Utility functions shared across the application.
//!
//! - [`url_normalizer`] - Probe target normalization and parsing

pub mod url_normalizer;

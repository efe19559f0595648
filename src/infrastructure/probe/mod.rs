//! Outbound availability probes.

mod http_prober;

pub use http_prober::{HttpProber, ProberSettings};

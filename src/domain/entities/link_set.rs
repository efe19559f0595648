//! Link set entity: one batch of checked URLs and their availability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identity of a stored link set. Assigned from 1 in strictly increasing order.
pub type LinkSetId = u64;

/// Result of probing one URL.
///
/// Serialized as the literal strings `"available"` and `"not available"`;
/// consumers must not assume any other value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkStatus {
    #[serde(rename = "available")]
    Available,
    #[serde(rename = "not available")]
    NotAvailable,
}

impl LinkStatus {
    /// Classifies an HTTP status code: anything below 400 is available.
    pub fn from_http_status(code: u16) -> Self {
        if code < 400 {
            Self::Available
        } else {
            Self::NotAvailable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::NotAvailable => "not available",
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// URL (as submitted) to availability.
pub type LinkStatuses = BTreeMap<String, LinkStatus>;

/// An immutable, timestamped record of one batch check.
///
/// Created once by a successful batch check and never updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSet {
    pub identity: LinkSetId,
    pub links: LinkStatuses,
    pub timestamp: DateTime<Utc>,
}

impl LinkSet {
    /// Creates a new LinkSet instance.
    pub fn new(identity: LinkSetId, links: LinkStatuses, timestamp: DateTime<Utc>) -> Self {
        Self {
            identity,
            links,
            timestamp,
        }
    }

    /// Number of links marked available.
    pub fn available_count(&self) -> usize {
        self.links.values().filter(|s| s.is_available()).count()
    }
}

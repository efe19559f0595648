//! DTOs for the administrative listing endpoint.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::entities::{LinkSet, LinkSetId};

/// Every stored link set.
#[derive(Debug, Serialize)]
pub struct LinkSetListResponse {
    pub total: usize,
    pub next_id: LinkSetId,
    pub link_sets: BTreeMap<LinkSetId, LinkSet>,
}

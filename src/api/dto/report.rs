//! DTOs for the link set retrieval endpoint.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::domain::entities::{LinkSet, LinkSetId};

/// Request for previously stored link sets.
#[derive(Debug, Deserialize, Validate)]
pub struct ReportRequest {
    #[validate(length(min = 1, message = "No links list provided"))]
    pub links_list: Vec<LinkSetId>,
}

/// Requested link sets that exist, keyed by identity.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub link_sets: BTreeMap<LinkSetId, LinkSet>,
}

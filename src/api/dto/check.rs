//! DTOs for the batch check endpoint.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::{LinkSetId, LinkStatuses};

/// Request to check a batch of links.
///
/// Links may be bare hosts (`example.com`), full HTTP(S) URLs or in-page
/// anchors (`#section`). Duplicates are allowed.
#[derive(Debug, Deserialize, Validate)]
pub struct CheckRequest {
    #[validate(
        length(min = 1, message = "No links provided"),
        custom(function = "validate_links")
    )]
    pub links: Vec<String>,
}

/// Result of a batch check with the identity of the stored link set.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub links: LinkStatuses,
    pub links_num: LinkSetId,
}

fn validate_links(links: &[String]) -> Result<(), ValidationError> {
    if links.iter().any(|l| l.trim().is_empty()) {
        let mut err = ValidationError::new("empty_link");
        err.message = Some("Links must not be empty".into());
        return Err(err);
    }
    Ok(())
}

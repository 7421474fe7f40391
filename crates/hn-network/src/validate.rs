//! Construction-time validation: reject bad inputs before any solve attempt.

use std::collections::HashSet;

use crate::error::NetworkError;
use crate::model::{Link, Node};

pub(crate) fn validate_inputs(nodes: &[Node], links: &[Link]) -> Result<(), NetworkError> {
    if nodes.is_empty() {
        return Err(NetworkError::EmptyNodes);
    }
    if links.is_empty() {
        return Err(NetworkError::EmptyLinks);
    }

    let mut node_codes = HashSet::new();
    let mut node_ids = HashSet::new();
    for node in nodes {
        if !node_codes.insert(node.code.as_str()) {
            return Err(NetworkError::DuplicateNodeCode {
                code: node.code.clone(),
            });
        }
        if !node_ids.insert(node.external_id) {
            return Err(NetworkError::DuplicateExternalId { what: "node" });
        }
    }

    let mut link_codes = HashSet::new();
    let mut link_ids = HashSet::new();
    for link in links {
        if !link_codes.insert(link.code.as_str()) {
            return Err(NetworkError::DuplicateLinkCode {
                code: link.code.clone(),
            });
        }
        if !link_ids.insert(link.external_id) {
            return Err(NetworkError::DuplicateExternalId { what: "link" });
        }

        if link.length_m <= 0.0 {
            return Err(NetworkError::NonPositiveAttribute {
                link: link.code.clone(),
                what: "length",
            });
        }
        if link.diameter_mm <= 0.0 {
            return Err(NetworkError::NonPositiveAttribute {
                link: link.code.clone(),
                what: "diameter",
            });
        }
        if link.hazen_williams_c <= 0.0 {
            return Err(NetworkError::NonPositiveAttribute {
                link: link.code.clone(),
                what: "roughness coefficient",
            });
        }

        let n = nodes.len() as u32;
        if link.from.index() >= n || link.to.index() >= n {
            return Err(NetworkError::DanglingEndpoint {
                link: link.code.clone(),
            });
        }
    }

    Ok(())
}

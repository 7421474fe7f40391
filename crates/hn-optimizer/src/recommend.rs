//! Per-link diameter change recommendations from an optimization result.

use hn_core::Real;
use hn_network::NetworkModel;
use uuid::Uuid;

use crate::individual::Individual;

/// Direction of a proposed diameter change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiameterAction {
    Increase,
    Reduce,
}

/// A proposed change for one link.
#[derive(Debug, Clone, PartialEq)]
pub struct DiameterRecommendation {
    pub link_code: String,
    pub link_external_id: Uuid,
    pub current_diameter_mm: Real,
    pub proposed_diameter_mm: Real,
    pub action: DiameterAction,
}

/// Links whose optimized diameter differs from the current one by more than
/// a millimeter, in link-handle order.
pub fn recommendations(model: &NetworkModel, best: &Individual) -> Vec<DiameterRecommendation> {
    model
        .links()
        .iter()
        .zip(&best.chromosome)
        .filter(|&(link, proposed)| (*proposed - link.diameter_mm).abs() > 1.0)
        .map(|(link, &proposed)| DiameterRecommendation {
            link_code: link.code.clone(),
            link_external_id: link.external_id,
            current_diameter_mm: link.diameter_mm,
            proposed_diameter_mm: proposed,
            action: if proposed > link.diameter_mm {
                DiameterAction::Increase
            } else {
                DiameterAction::Reduce
            },
        })
        .collect()
}

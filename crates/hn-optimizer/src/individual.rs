//! Candidate solutions of the diameter search.

use hn_core::Real;

/// One candidate diameter assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    /// One catalog diameter (mm) per link, in link-handle order.
    pub chromosome: Vec<Real>,
    /// Cost plus constraint penalty; lower is better.
    pub fitness: Real,
    /// True when every estimated pressure met the minimum.
    pub feasible: bool,
}

impl Individual {
    /// Fresh, not-yet-evaluated individual.
    pub fn new(chromosome: Vec<Real>) -> Self {
        Self {
            chromosome,
            fitness: 0.0,
            feasible: false,
        }
    }
}

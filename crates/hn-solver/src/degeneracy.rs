//! Accounting for numerically degenerate short-circuits.
//!
//! The solvers deliberately substitute zero instead of raising when a
//! denominator vanishes. Each substitution is counted here (and logged) so
//! callers and tests can detect the masking instead of it staying silent.

/// Counts of degenerate short-circuits taken during one solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DegeneracyCounters {
    /// Loop corrections skipped because every loop link had zero flow.
    pub zero_flow_denominators: u64,
    /// Velocity computations short-circuited by a non-positive diameter.
    pub zero_diameter_velocities: u64,
}

impl DegeneracyCounters {
    /// True when no short-circuit was taken.
    pub fn is_clean(&self) -> bool {
        self.zero_flow_denominators == 0 && self.zero_diameter_velocities == 0
    }

    /// Fold another set of counters into this one.
    pub fn absorb(&mut self, other: DegeneracyCounters) {
        self.zero_flow_denominators += other.zero_flow_denominators;
        self.zero_diameter_velocities += other.zero_diameter_velocities;
    }
}

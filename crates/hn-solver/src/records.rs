//! Per-iteration ledger of the loop solver.

use hn_core::{LoopId, Real};

/// One outer pass of the loop-correction method.
///
/// Records are appended every pass regardless of outcome, so a caller can
/// reconstruct the whole run for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    /// 1-based pass number.
    pub iteration: usize,
    /// Flow correction applied to each loop this pass, in loop order.
    pub corrections: Vec<(LoopId, Real)>,
    /// Sum of absolute corrections across loops.
    pub delta_q_total: Real,
    /// Maximum absolute correction across loops.
    pub max_error: Real,
    /// Whether this pass brought the maximum error under tolerance.
    pub converged: bool,
}

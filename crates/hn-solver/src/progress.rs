//! Progress events emitted during a solve.
//!
//! The solver narrates through an injected callback instead of printing, so
//! a caller can forward events to a UI, a log, or nothing at all.

use hn_core::Real;

/// Coarse phase of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStage {
    DetectingLoops,
    BalancingLoops,
    PropagatingBranches,
    Completed,
}

/// Fine-grained progress notification.
#[derive(Debug, Clone)]
pub enum SolveProgressEvent {
    StageStarted { stage: SolveStage },
    LoopIteration { iteration: usize, max_error: Real },
    LoopPhaseCompleted {
        converged: bool,
        iterations: usize,
        final_error: Real,
    },
    Completed {
        resolved_nodes: usize,
        unresolved_nodes: usize,
    },
}

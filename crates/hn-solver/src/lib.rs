//! Steady-state hydraulic solvers for water-distribution networks.
//!
//! This crate provides the loop-correction (Hardy Cross) solver for closed
//! portions of a network, breadth-first propagation for open (branched)
//! portions, and a hybrid driver for mixed topologies. Head losses follow the
//! Hazen-Williams relation in practical units (flow l/s, diameter mm,
//! length m, head m).

pub mod degeneracy;
pub mod error;
pub mod hardy_cross;
pub mod hazen;
pub mod hybrid;
pub mod progress;
pub mod propagate;
pub mod records;

pub use degeneracy::DegeneracyCounters;
pub use error::{SolverError, SolverResult};
pub use hardy_cross::{HardyCrossConfig, HardyCrossOutcome, HardyCrossSolver};
pub use hazen::{
    HAZEN_WILLIAMS_K, HAZEN_WILLIAMS_N, HazenWilliams, head_loss_m, link_resistance, velocity_ms,
};
pub use hybrid::{HybridOutcome, HybridSolver};
pub use progress::{SolveProgressEvent, SolveStage};
pub use propagate::{OpenNetworkPropagator, PropagationOutcome};
pub use records::IterationRecord;

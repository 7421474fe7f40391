//! hn-optimizer: genetic-algorithm search for commercial pipe diameters.
//!
//! Minimizes material cost under a minimum-pressure constraint. Fitness uses
//! a deliberately coarse single-pass pressure estimate rather than the full
//! loop solver, trading accuracy for the throughput the population search
//! needs.

pub mod error;
pub mod fitness;
pub mod ga;
pub mod individual;
pub mod recommend;

pub use error::{OptimizerError, OptimizerResult};
pub use fitness::FitnessModel;
pub use ga::{DiameterOptimizer, GaConfig, GenerationStats, OptimizationOutcome};
pub use individual::Individual;
pub use recommend::{DiameterAction, DiameterRecommendation, recommendations};

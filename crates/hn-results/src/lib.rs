//! hn-results: plain serializable result data.
//!
//! Snapshots of a solve or an optimization run, shaped for an external
//! persistence/reporting layer (database rows, EPANET/GeoJSON/spreadsheet
//! exporters). No formatting logic lives here, only the data.

mod build;
pub mod types;

pub use build::{optimization_report, solve_report};
pub use types::{
    DiameterRow, GenerationRow, IterationRow, LinkResultRow, LoopCorrectionRow, NodeResultRow,
    OptimizationReport, RecommendationRow, SolveReport, SolveSummary,
};

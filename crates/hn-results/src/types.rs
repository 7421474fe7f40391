//! Result data types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Solved quantities for one node. Only resolved nodes produce a row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeResultRow {
    pub code: String,
    pub external_id: Uuid,
    pub kind: String,
    pub elevation_m: f64,
    pub demand_lps: f64,
    pub grade_m: f64,
    pub pressure_m: f64,
}

/// Solved quantities for one link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkResultRow {
    pub code: String,
    pub external_id: Uuid,
    pub length_m: f64,
    pub diameter_mm: f64,
    pub flow_lps: f64,
    pub velocity_ms: f64,
    pub head_loss_m: f64,
}

/// One loop's correction within one solver pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopCorrectionRow {
    pub loop_index: u32,
    pub delta_q_lps: f64,
}

/// One solver pass of the iteration ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRow {
    pub iteration: usize,
    pub delta_q_total: f64,
    pub max_error: f64,
    pub converged: bool,
    pub corrections: Vec<LoopCorrectionRow>,
}

/// Headline numbers of a solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveSummary {
    pub network_class: String,
    pub node_count: usize,
    pub link_count: usize,
    pub loop_count: usize,
    pub iterations_run: usize,
    pub converged: bool,
    pub final_error: f64,
    /// Extremes over positive resolved values; None when nothing qualifies.
    pub min_pressure_m: Option<f64>,
    pub max_pressure_m: Option<f64>,
    pub min_velocity_ms: Option<f64>,
    pub max_velocity_ms: Option<f64>,
    pub unresolved_nodes: usize,
    pub warnings: Vec<String>,
}

/// Everything a solve hands to the reporting layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReport {
    pub summary: SolveSummary,
    pub nodes: Vec<NodeResultRow>,
    pub links: Vec<LinkResultRow>,
    pub iterations: Vec<IterationRow>,
}

/// Population summary of one GA generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRow {
    pub generation: usize,
    pub best_fitness: f64,
    pub worst_fitness: f64,
    pub mean_fitness: f64,
    pub feasible_count: usize,
}

/// One link's diameter in the winning assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiameterRow {
    pub link_code: String,
    pub external_id: Uuid,
    pub diameter_mm: f64,
}

/// One proposed diameter change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRow {
    pub link_code: String,
    pub external_id: Uuid,
    pub current_diameter_mm: f64,
    pub proposed_diameter_mm: f64,
    pub action: String,
}

/// Everything an optimization run hands to the reporting layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub feasible: bool,
    pub total_cost: f64,
    pub improvement_pct: f64,
    pub diameters: Vec<DiameterRow>,
    pub history: Vec<GenerationRow>,
    pub recommendations: Vec<RecommendationRow>,
}

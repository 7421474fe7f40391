//! Assembly of report data from solver and optimizer outputs.

use hn_network::{NetworkModel, NetworkState};
use hn_optimizer::{DiameterAction, OptimizationOutcome, recommendations};
use hn_solver::HybridOutcome;

use crate::types::{
    DiameterRow, GenerationRow, IterationRow, LinkResultRow, LoopCorrectionRow, NodeResultRow,
    OptimizationReport, RecommendationRow, SolveReport, SolveSummary,
};

/// Snapshot a finished hybrid solve into serializable rows.
///
/// Unresolved nodes are excluded from the node rows; they are still counted
/// in the summary.
pub fn solve_report(
    model: &NetworkModel,
    state: &NetworkState,
    outcome: &HybridOutcome,
) -> SolveReport {
    let nodes: Vec<NodeResultRow> = model
        .nodes()
        .iter()
        .filter_map(|node| {
            state.node(node.id).map(|ns| NodeResultRow {
                code: node.code.clone(),
                external_id: node.external_id,
                kind: node.kind.as_str().to_string(),
                elevation_m: node.elevation_m,
                demand_lps: node.demand_lps,
                grade_m: ns.grade_m,
                pressure_m: ns.pressure_m,
            })
        })
        .collect();

    let links: Vec<LinkResultRow> = model
        .links()
        .iter()
        .map(|link| {
            let ls = state.link(link.id);
            LinkResultRow {
                code: link.code.clone(),
                external_id: link.external_id,
                length_m: link.length_m,
                diameter_mm: link.diameter_mm,
                flow_lps: ls.flow_lps,
                velocity_ms: ls.velocity_ms,
                head_loss_m: ls.head_loss_m,
            }
        })
        .collect();

    let iterations: Vec<IterationRow> = outcome
        .iterations
        .iter()
        .map(|rec| IterationRow {
            iteration: rec.iteration,
            delta_q_total: rec.delta_q_total,
            max_error: rec.max_error,
            converged: rec.converged,
            corrections: rec
                .corrections
                .iter()
                .map(|&(loop_id, dq)| LoopCorrectionRow {
                    loop_index: loop_id.index(),
                    delta_q_lps: dq,
                })
                .collect(),
        })
        .collect();

    let (min_pressure_m, max_pressure_m) = extremes(nodes.iter().map(|n| n.pressure_m));
    let (min_velocity_ms, max_velocity_ms) = extremes(links.iter().map(|l| l.velocity_ms));

    SolveReport {
        summary: SolveSummary {
            network_class: outcome.class.as_str().to_string(),
            node_count: model.nodes().len(),
            link_count: model.links().len(),
            loop_count: outcome.loops.len(),
            iterations_run: outcome.iterations.len(),
            converged: outcome.converged,
            final_error: outcome.final_error,
            min_pressure_m,
            max_pressure_m,
            min_velocity_ms,
            max_velocity_ms,
            unresolved_nodes: outcome.unresolved.len(),
            warnings: outcome.warnings.clone(),
        },
        nodes,
        links,
        iterations,
    }
}

/// Snapshot a finished optimization into serializable rows.
pub fn optimization_report(model: &NetworkModel, outcome: &OptimizationOutcome) -> OptimizationReport {
    let diameters = model
        .links()
        .iter()
        .zip(&outcome.best.chromosome)
        .map(|(link, &d)| DiameterRow {
            link_code: link.code.clone(),
            external_id: link.external_id,
            diameter_mm: d,
        })
        .collect();

    let history = outcome
        .history
        .iter()
        .map(|stats| GenerationRow {
            generation: stats.generation,
            best_fitness: stats.best_fitness,
            worst_fitness: stats.worst_fitness,
            mean_fitness: stats.mean_fitness,
            feasible_count: stats.feasible_count,
        })
        .collect();

    let recs = recommendations(model, &outcome.best)
        .into_iter()
        .map(|rec| RecommendationRow {
            link_code: rec.link_code,
            external_id: rec.link_external_id,
            current_diameter_mm: rec.current_diameter_mm,
            proposed_diameter_mm: rec.proposed_diameter_mm,
            action: match rec.action {
                DiameterAction::Increase => "increase".to_string(),
                DiameterAction::Reduce => "reduce".to_string(),
            },
        })
        .collect();

    OptimizationReport {
        feasible: outcome.best.feasible,
        total_cost: outcome.best_cost,
        improvement_pct: outcome.improvement_pct,
        diameters,
        history,
        recommendations: recs,
    }
}

/// Min/max over positive values only.
fn extremes(values: impl Iterator<Item = f64>) -> (Option<f64>, Option<f64>) {
    let mut min = None;
    let mut max = None;
    for v in values.filter(|v| *v > 0.0) {
        min = Some(min.map_or(v, |m: f64| m.min(v)));
        max = Some(max.map_or(v, |m: f64| m.max(v)));
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_ignore_non_positive() {
        let (min, max) = extremes([0.0, -2.0, 3.0, 1.0].into_iter());
        assert_eq!(min, Some(1.0));
        assert_eq!(max, Some(3.0));

        let (min, max) = extremes([0.0, -1.0].into_iter());
        assert_eq!(min, None);
        assert_eq!(max, None);
    }
}

//! Hybrid driver for mixed topologies: balance loops, then extend grades
//! across attached branches.

use hn_core::{NodeId, Real, ensure_finite};
use hn_network::{Loop, NetworkClass, NetworkModel, NetworkState, NodeState, classify, find_loops};
use tracing::warn;

use crate::degeneracy::DegeneracyCounters;
use crate::error::SolverResult;
use crate::hardy_cross::{HardyCrossConfig, HardyCrossSolver};
use crate::hazen::velocity_ms;
use crate::progress::{SolveProgressEvent, SolveStage};
use crate::propagate::OpenNetworkPropagator;
use crate::records::IterationRecord;

/// Everything a hybrid run produces, ready to hand to a reporting layer.
#[derive(Debug, Clone)]
pub struct HybridOutcome {
    /// Whether the loop phase converged. Propagation runs either way.
    pub converged: bool,
    pub final_error: Real,
    pub class: NetworkClass,
    pub loops: Vec<Loop>,
    pub iterations: Vec<IterationRecord>,
    /// Nodes no source could reach; excluded from results.
    pub unresolved: Vec<NodeId>,
    /// Human-readable degradations (currently only loop non-convergence).
    pub warnings: Vec<String>,
    pub degeneracy: DegeneracyCounters,
}

/// Orchestrates the loop solver and the tree propagator over one model.
pub struct HybridSolver<'a> {
    model: &'a NetworkModel,
    config: HardyCrossConfig,
}

impl<'a> HybridSolver<'a> {
    pub fn new(model: &'a NetworkModel, config: HardyCrossConfig) -> Self {
        Self { model, config }
    }

    pub fn solve(&self, state: &mut NetworkState) -> SolverResult<HybridOutcome> {
        self.solve_with_progress(state, &mut |_| {})
    }

    /// Full solve, narrating stages and loop passes through `progress`.
    pub fn solve_with_progress(
        &self,
        state: &mut NetworkState,
        progress: &mut dyn FnMut(SolveProgressEvent),
    ) -> SolverResult<HybridOutcome> {
        progress(SolveProgressEvent::StageStarted {
            stage: SolveStage::DetectingLoops,
        });
        let loops = find_loops(self.model)?;
        let class = classify(self.model, &loops);

        progress(SolveProgressEvent::StageStarted {
            stage: SolveStage::BalancingLoops,
        });
        let solver = HardyCrossSolver::with_loops(self.model, loops.clone(), self.config);
        let loop_outcome = solver.solve_with_progress(state, progress);
        // Non-convergence is tolerated below; runaway arithmetic is not
        ensure_finite(loop_outcome.final_error, "loop correction error")?;
        for lp in &loops {
            for ll in &lp.links {
                ensure_finite(state.link(ll.link).flow_lps, "balanced loop flow")?;
            }
        }
        progress(SolveProgressEvent::LoopPhaseCompleted {
            converged: loop_outcome.converged,
            iterations: loop_outcome.iterations.len(),
            final_error: loop_outcome.final_error,
        });

        let mut warnings = Vec::new();
        if !loop_outcome.converged {
            warn!(
                final_error = loop_outcome.final_error,
                "loop phase did not converge; propagating best-effort flows"
            );
            warnings.push(format!(
                "loop phase did not converge after {} iterations (max error {:.3e})",
                loop_outcome.iterations.len(),
                loop_outcome.final_error
            ));
        }

        // Loop links keep their balanced flows; everything else is
        // apportioned by the tree propagator.
        progress(SolveProgressEvent::StageStarted {
            stage: SolveStage::PropagatingBranches,
        });
        let mut fixed = vec![false; self.model.links().len()];
        for lp in &loops {
            for ll in &lp.links {
                fixed[ll.link.index() as usize] = true;
            }
        }
        let propagation = OpenNetworkPropagator::with_hazen(self.model, self.config.hazen)
            .propagate_with_fixed(state, &fixed);

        let mut degeneracy = loop_outcome.degeneracy;
        degeneracy.absorb(propagation.degeneracy);
        self.refresh_network(state, &mut degeneracy);

        progress(SolveProgressEvent::StageStarted {
            stage: SolveStage::Completed,
        });
        progress(SolveProgressEvent::Completed {
            resolved_nodes: propagation.order.len(),
            unresolved_nodes: propagation.unresolved.len(),
        });

        Ok(HybridOutcome {
            converged: loop_outcome.converged,
            final_error: loop_outcome.final_error,
            class,
            loops,
            iterations: loop_outcome.iterations,
            unresolved: propagation.unresolved,
            warnings,
            degeneracy,
        })
    }

    /// Final consistency pass: recompute every link's head loss and velocity
    /// from the magnitude of its settled flow, and every resolved node's
    /// pressure from its grade.
    fn refresh_network(&self, state: &mut NetworkState, degeneracy: &mut DegeneracyCounters) {
        for link in self.model.links() {
            // Links between unresolved nodes carry no flow
            if state.node(link.from).is_none() || state.node(link.to).is_none() {
                *state.link_mut(link.id) = Default::default();
                continue;
            }

            let q_abs = state.link(link.id).flow_lps.abs();
            let hf = self
                .config
                .hazen
                .head_loss_m(q_abs, link.diameter_mm, link.length_m, link.hazen_williams_c);
            let v = velocity_ms(q_abs, link.diameter_mm, degeneracy);
            let ls = state.link_mut(link.id);
            ls.head_loss_m = hf;
            ls.velocity_ms = v;
        }

        for node in self.model.nodes() {
            if let Some(ns) = state.node(node.id) {
                let grade = ns.grade_m;
                state.set_node(
                    node.id,
                    NodeState {
                        grade_m: grade,
                        pressure_m: grade - node.elevation_m,
                    },
                );
            }
        }
    }
}

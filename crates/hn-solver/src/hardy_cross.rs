//! Loop-flow correction (Hardy Cross) for closed network portions.

use hn_core::{LinkId, Real};
use hn_network::{Loop, NetworkModel, NetworkState, find_loops};
use tracing::{debug, warn};

use crate::degeneracy::DegeneracyCounters;
use crate::error::SolverResult;
use crate::hazen::{HazenWilliams, velocity_ms};
use crate::progress::SolveProgressEvent;
use crate::records::IterationRecord;

/// Loop solver configuration.
#[derive(Debug, Clone, Copy)]
pub struct HardyCrossConfig {
    /// Convergence tolerance on the maximum absolute loop correction (l/s).
    pub tolerance: Real,
    /// Maximum outer passes before giving up.
    pub max_iterations: usize,
    /// Head-loss relation constants.
    pub hazen: HazenWilliams,
}

impl Default for HardyCrossConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-7,
            max_iterations: 1000,
            hazen: HazenWilliams::default(),
        }
    }
}

/// Loop solver result.
///
/// Running out of iterations is a reported outcome, not an error; the caller
/// decides whether a non-converged flow field is acceptable.
#[derive(Debug, Clone)]
pub struct HardyCrossOutcome {
    pub converged: bool,
    /// Maximum absolute correction of the last pass (l/s).
    pub final_error: Real,
    /// One record per pass, in order.
    pub iterations: Vec<IterationRecord>,
    pub degeneracy: DegeneracyCounters,
}

/// Iteratively balances flow around each loop until the head-loss imbalance
/// is within tolerance.
///
/// Loops are identified once at construction and reused for every pass.
pub struct HardyCrossSolver<'a> {
    model: &'a NetworkModel,
    loops: Vec<Loop>,
    config: HardyCrossConfig,
}

impl<'a> HardyCrossSolver<'a> {
    /// Detect loops and build a solver for `model`.
    pub fn new(model: &'a NetworkModel, config: HardyCrossConfig) -> SolverResult<Self> {
        let loops = find_loops(model)?;
        Ok(Self::with_loops(model, loops, config))
    }

    /// Build a solver over pre-detected loops.
    pub fn with_loops(model: &'a NetworkModel, loops: Vec<Loop>, config: HardyCrossConfig) -> Self {
        Self {
            model,
            loops,
            config,
        }
    }

    pub fn loops(&self) -> &[Loop] {
        &self.loops
    }

    /// Seed every link with total demand / link count.
    ///
    /// The uniform seed keeps links away from zero flow, where the correction
    /// gradient is singular.
    pub fn seed_flows(&self, state: &mut NetworkState) {
        let links = self.model.links();
        let per_link = self.model.total_demand_lps() / links.len() as Real;
        let mut degeneracy = DegeneracyCounters::default();
        for link in links {
            state.link_mut(link.id).flow_lps = per_link;
            self.refresh_link(link.id, state, &mut degeneracy);
        }
    }

    /// Seed uniformly, then balance.
    pub fn solve(&self, state: &mut NetworkState) -> HardyCrossOutcome {
        self.seed_flows(state);
        self.solve_seeded(state)
    }

    /// Seed uniformly, then balance, narrating each pass.
    pub fn solve_with_progress(
        &self,
        state: &mut NetworkState,
        progress: &mut dyn FnMut(SolveProgressEvent),
    ) -> HardyCrossOutcome {
        self.seed_flows(state);
        self.solve_seeded_with_progress(state, progress)
    }

    /// Balance from whatever flows `state` already carries (warm start).
    pub fn solve_seeded(&self, state: &mut NetworkState) -> HardyCrossOutcome {
        self.solve_seeded_with_progress(state, &mut |_| {})
    }

    /// Balance from existing flows, narrating each pass.
    pub fn solve_seeded_with_progress(
        &self,
        state: &mut NetworkState,
        progress: &mut dyn FnMut(SolveProgressEvent),
    ) -> HardyCrossOutcome {
        let mut degeneracy = DegeneracyCounters::default();
        let mut records = Vec::new();
        let mut final_error = 0.0;

        for iteration in 1..=self.config.max_iterations {
            // Compute every loop's correction from the current flows, then
            // apply them all: a link shared by several loops accumulates one
            // correction per loop within the same pass.
            let mut corrections = Vec::with_capacity(self.loops.len());
            let mut max_error: Real = 0.0;
            for lp in &self.loops {
                let dq = self.loop_correction(lp, state, &mut degeneracy);
                max_error = max_error.max(dq.abs());
                corrections.push((lp.id, dq));
            }

            for (lp, &(_, dq)) in self.loops.iter().zip(&corrections) {
                for ll in &lp.links {
                    state.link_mut(ll.link).flow_lps += ll.sign() * dq;
                }
            }
            for lp in &self.loops {
                for ll in &lp.links {
                    self.refresh_link(ll.link, state, &mut degeneracy);
                }
            }

            let converged = max_error < self.config.tolerance;
            let delta_q_total = corrections.iter().map(|&(_, c)| c.abs()).sum();
            records.push(IterationRecord {
                iteration,
                corrections,
                delta_q_total,
                max_error,
                converged,
            });
            progress(SolveProgressEvent::LoopIteration {
                iteration,
                max_error,
            });
            final_error = max_error;

            if converged {
                debug!(iteration, max_error, "loop corrections converged");
                return HardyCrossOutcome {
                    converged: true,
                    final_error,
                    iterations: records,
                    degeneracy,
                };
            }
        }

        warn!(
            max_iterations = self.config.max_iterations,
            final_error, "loop corrections exhausted iteration budget"
        );
        HardyCrossOutcome {
            converged: false,
            final_error,
            iterations: records,
            degeneracy,
        }
    }

    /// Correction for one loop:
    /// `dq = -sum(signed h_f) / sum(d h_f / d Q)`.
    ///
    /// Head losses are signed by the flow direction relative to the loop
    /// traversal, so a balanced loop sums to zero. A zero gradient (every
    /// loop link at zero flow) short-circuits to no correction.
    fn loop_correction(
        &self,
        lp: &Loop,
        state: &NetworkState,
        degeneracy: &mut DegeneracyCounters,
    ) -> Real {
        let mut head_sum = 0.0;
        let mut gradient = 0.0;

        let hazen = self.config.hazen;
        for ll in &lp.links {
            let link = &self.model.links()[ll.link.index() as usize];
            let q_loop = ll.sign() * state.link(ll.link).flow_lps;
            let q_abs = q_loop.abs();
            let resistance = hazen.resistance(link.length_m, link.diameter_mm, link.hazen_williams_c);

            let hf = hazen.k * q_abs.powf(hazen.n) * resistance;
            head_sum += q_loop.signum() * hf;
            gradient += hazen.loss_gradient(q_abs, resistance);
        }

        if gradient == 0.0 {
            warn!(loop_id = %lp.id, "loop correction skipped: zero-flow gradient");
            degeneracy.zero_flow_denominators += 1;
            return 0.0;
        }

        -head_sum / gradient
    }

    /// Recompute a link's head loss and velocity from the magnitude of its
    /// current flow.
    fn refresh_link(&self, id: LinkId, state: &mut NetworkState, degeneracy: &mut DegeneracyCounters) {
        let link = &self.model.links()[id.index() as usize];
        let q_abs = state.link(id).flow_lps.abs();
        let hf = self
            .config
            .hazen
            .head_loss_m(q_abs, link.diameter_mm, link.length_m, link.hazen_williams_c);
        let v = velocity_ms(q_abs, link.diameter_mm, degeneracy);

        let ls = state.link_mut(id);
        ls.head_loss_m = hf;
        ls.velocity_ms = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_network::{NetworkBuilder, NodeKind, PipeSpec};

    #[test]
    fn no_loops_converges_immediately() {
        let mut builder = NetworkBuilder::new();
        let a = builder.add_node("A", NodeKind::Reservoir, 100.0, 0.0);
        let b = builder.add_node("B", NodeKind::Consumption, 90.0, 5.0);
        builder.add_link("AB", a, b, PipeSpec::new(100.0, 100.0));
        let model = builder.build().unwrap();

        let solver = HardyCrossSolver::new(&model, HardyCrossConfig::default()).unwrap();
        let mut state = NetworkState::new(&model);
        let outcome = solver.solve(&mut state);

        assert!(outcome.converged);
        assert_eq!(outcome.iterations.len(), 1);
        assert_eq!(outcome.final_error, 0.0);
    }

    #[test]
    fn seed_is_uniform_share_of_demand() {
        let mut builder = NetworkBuilder::new();
        let a = builder.add_node("A", NodeKind::Reservoir, 100.0, 0.0);
        let b = builder.add_node("B", NodeKind::Junction, 95.0, 4.0);
        let c = builder.add_node("C", NodeKind::Consumption, 90.0, 8.0);
        builder.add_link("AB", a, b, PipeSpec::new(100.0, 100.0));
        builder.add_link("BC", b, c, PipeSpec::new(100.0, 100.0));
        builder.add_link("CA", c, a, PipeSpec::new(100.0, 100.0));
        let model = builder.build().unwrap();

        let solver = HardyCrossSolver::new(&model, HardyCrossConfig::default()).unwrap();
        let mut state = NetworkState::new(&model);
        solver.seed_flows(&mut state);

        for link in model.links() {
            assert_eq!(state.link(link.id).flow_lps, 4.0);
            assert!(state.link(link.id).velocity_ms > 0.0);
        }
    }
}

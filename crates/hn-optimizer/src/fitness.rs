//! Cost and constraint evaluation for candidate diameter assignments.
//!
//! The pressure estimate here is intentionally cruder than the loop solver:
//! one hydrostatic reference plus a loss term over the links touching the
//! reference node. It is draw-free and cheap enough to run once per
//! individual per generation.

use hn_core::{NodeId, Real};
use hn_network::NetworkModel;

use crate::individual::Individual;

/// Water column assumed above the reference node (m).
const SOURCE_COLUMN_M: Real = 30.0;

/// Diameter exponent of the approximate loss term.
const ESTIMATE_DIAMETER_EXPONENT: Real = 4.87;

/// Scale of the approximate loss term.
const ESTIMATE_LOSS_SCALE: Real = 1.0e4;

/// Weight of the quadratic deficit penalty. Dominant, so the search
/// prioritizes feasibility over cost.
const DEFICIT_WEIGHT: Real = 1000.0;

/// Weight of the linear oversizing penalty above twice the minimum pressure.
const EXCESS_WEIGHT: Real = 10.0;

/// Evaluates cost + penalty for chromosomes over one network.
pub struct FitnessModel<'a> {
    model: &'a NetworkModel,
    catalog: &'a [Real],
    unit_cost_per_m: Real,
    min_pressure_m: Real,
    reference: NodeId,
    /// Positions (gene indices) of the links touching the reference node.
    reference_genes: Vec<usize>,
}

impl<'a> FitnessModel<'a> {
    /// `catalog` must be sorted ascending; its first entry anchors the cost
    /// scaling.
    pub fn new(
        model: &'a NetworkModel,
        catalog: &'a [Real],
        unit_cost_per_m: Real,
        min_pressure_m: Real,
    ) -> Self {
        // The designated reference is the first source-kind node, falling
        // back to the first node of the arena.
        let reference = model
            .source_nodes()
            .next()
            .map(|n| n.id)
            .unwrap_or_else(|| model.nodes()[0].id);

        let reference_genes = model
            .links()
            .iter()
            .enumerate()
            .filter(|(_, l)| l.from == reference || l.to == reference)
            .map(|(i, _)| i)
            .collect();

        Self {
            model,
            catalog,
            unit_cost_per_m,
            min_pressure_m,
            reference,
            reference_genes,
        }
    }

    pub fn reference(&self) -> NodeId {
        self.reference
    }

    /// Material cost: per link, length x unit cost x (d / min catalog d)^1.5.
    ///
    /// The superlinear exponent discourages oversizing beyond what the
    /// pressure constraint needs.
    pub fn cost(&self, chromosome: &[Real]) -> Real {
        let min_d = self.catalog[0];
        self.model
            .links()
            .iter()
            .zip(chromosome)
            .map(|(link, &d)| link.length_m * self.unit_cost_per_m * (d / min_d).powf(1.5))
            .sum()
    }

    /// Single-pass pressure estimate per node (m of column).
    ///
    /// The reference sits at its elevation plus an assumed column; every
    /// other node sees that head minus a loss accumulated only over the
    /// links touching the reference, clamped at zero.
    pub fn estimate_pressures(&self, chromosome: &[Real]) -> Vec<(NodeId, Real)> {
        let nodes = self.model.nodes();
        let ref_node = &nodes[self.reference.index() as usize];
        let ref_head = ref_node.elevation_m + SOURCE_COLUMN_M;

        let loss: Real = self
            .reference_genes
            .iter()
            .map(|&i| {
                let link = &self.model.links()[i];
                link.length_m / chromosome[i].powf(ESTIMATE_DIAMETER_EXPONENT)
                    * ESTIMATE_LOSS_SCALE
            })
            .sum();

        nodes
            .iter()
            .map(|n| {
                if n.id == self.reference {
                    (n.id, ref_head)
                } else {
                    (n.id, (ref_head - loss).max(0.0))
                }
            })
            .collect()
    }

    /// Penalty and feasibility from the estimated pressures.
    ///
    /// Deficits are punished quadratically (and flip feasibility); pressure
    /// above twice the minimum draws a mild linear penalty.
    pub fn constraint_penalty(&self, chromosome: &[Real]) -> (bool, Real) {
        let mut penalty = 0.0;
        let mut feasible = true;

        for (_, pressure) in self.estimate_pressures(chromosome) {
            if pressure < self.min_pressure_m {
                let deficit = self.min_pressure_m - pressure;
                penalty += deficit * deficit * DEFICIT_WEIGHT;
                feasible = false;
            } else if pressure > self.min_pressure_m * 2.0 {
                let excess = pressure - self.min_pressure_m * 2.0;
                penalty += excess * EXCESS_WEIGHT;
            }
        }

        (feasible, penalty)
    }

    /// Evaluate one individual in place: fitness = cost + penalty.
    pub fn evaluate(&self, individual: &mut Individual) {
        let cost = self.cost(&individual.chromosome);
        let (feasible, penalty) = self.constraint_penalty(&individual.chromosome);
        individual.fitness = cost + penalty;
        individual.feasible = feasible;
    }
}

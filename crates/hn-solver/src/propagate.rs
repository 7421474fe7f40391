//! Breadth-first head propagation for open (branched) network portions.

use std::collections::VecDeque;

use hn_core::{LinkId, NodeId, Real};
use hn_network::{NetworkModel, NetworkState, NodeState};
use tracing::debug;

use crate::degeneracy::DegeneracyCounters;
use crate::hazen::{HazenWilliams, velocity_ms};

/// What a propagation pass visited and what it could not reach.
#[derive(Debug, Clone)]
pub struct PropagationOutcome {
    /// Breadth-first visiting order, sources first.
    pub order: Vec<NodeId>,
    /// Nodes unreachable from every source; left unresolved, not fatal.
    pub unresolved: Vec<NodeId>,
    pub degeneracy: DegeneracyCounters,
}

/// Propagates hydraulic grades outward from source nodes across tree
/// (non-looped) portions of a network.
///
/// Sources (reservoirs, tanks, cisterns) act as fixed-grade boundaries at
/// their own elevation. Every other reached node hangs off its breadth-first
/// parent: grade = parent grade - parent link head loss, and pressure =
/// grade - elevation. Tree links carry the summed demand of everything
/// downstream of them.
pub struct OpenNetworkPropagator<'a> {
    model: &'a NetworkModel,
    hazen: HazenWilliams,
}

impl<'a> OpenNetworkPropagator<'a> {
    pub fn new(model: &'a NetworkModel) -> Self {
        Self::with_hazen(model, HazenWilliams::default())
    }

    pub fn with_hazen(model: &'a NetworkModel, hazen: HazenWilliams) -> Self {
        Self { model, hazen }
    }

    /// Propagate across a pure tree network: apportion all link flows, then
    /// assign grades.
    pub fn propagate(&self, state: &mut NetworkState) -> PropagationOutcome {
        let fixed = vec![false; self.model.links().len()];
        self.propagate_with_fixed(state, &fixed)
    }

    /// Propagate while leaving `fixed` links' flows and head losses alone
    /// (used by the hybrid driver for links already balanced by the loop
    /// solver).
    pub fn propagate_with_fixed(
        &self,
        state: &mut NetworkState,
        fixed: &[bool],
    ) -> PropagationOutcome {
        let nodes = self.model.nodes();
        let links = self.model.links();

        // Breadth-first forest rooted at every source node, edges scanned in
        // link-handle order for determinism.
        let mut visited = vec![false; nodes.len()];
        let mut parent_link: Vec<Option<LinkId>> = vec![None; nodes.len()];
        let mut order = Vec::new();
        let mut queue = VecDeque::new();

        for src in self.model.source_nodes() {
            let idx = src.id.index() as usize;
            if !visited[idx] {
                visited[idx] = true;
                queue.push_back(src.id);
            }
        }

        while let Some(node) = queue.pop_front() {
            order.push(node);
            for &lid in self.model.links_at(node) {
                let link = &links[lid.index() as usize];
                let Some(next) = link.other_end(node) else {
                    continue;
                };
                let ni = next.index() as usize;
                if !visited[ni] {
                    visited[ni] = true;
                    parent_link[ni] = Some(lid);
                    queue.push_back(next);
                }
            }
        }

        // Downstream demand accumulation: reverse visiting order folds each
        // child's subtree into its parent, so a pass-through node forwards
        // everything below it while a consumption node adds its own draw.
        let mut subtree_demand: Vec<Real> = nodes.iter().map(|n| n.demand_lps).collect();
        for &node in order.iter().rev() {
            let ni = node.index() as usize;
            if let Some(pl) = parent_link[ni] {
                let link = &links[pl.index() as usize];
                let parent = link
                    .other_end(node)
                    .expect("parent link joins node to its BFS parent");
                subtree_demand[parent.index() as usize] += subtree_demand[ni];
            }
        }

        // Tree-link flows: each non-fixed parent link carries its child's
        // subtree demand, signed by the link orientation.
        let mut degeneracy = DegeneracyCounters::default();
        for &node in &order {
            let ni = node.index() as usize;
            let Some(pl) = parent_link[ni] else {
                continue;
            };
            if fixed.get(pl.index() as usize).copied().unwrap_or(false) {
                continue;
            }
            let link = &links[pl.index() as usize];
            let q = subtree_demand[ni];
            let hf = self
                .hazen
                .head_loss_m(q.abs(), link.diameter_mm, link.length_m, link.hazen_williams_c);
            let v = velocity_ms(q.abs(), link.diameter_mm, &mut degeneracy);

            let ls = state.link_mut(pl);
            ls.flow_lps = if link.to == node { q } else { -q };
            ls.head_loss_m = hf;
            ls.velocity_ms = v;
        }

        // Grade pass in visiting order: roots sit at their own elevation,
        // every other node hangs off its parent minus the parent link's head
        // loss. Parents always precede children in the order.
        for &node in &order {
            let ni = node.index() as usize;
            let info = &nodes[ni];
            let grade = match parent_link[ni] {
                None => info.elevation_m,
                Some(pl) => {
                    let link = &links[pl.index() as usize];
                    let parent = link
                        .other_end(node)
                        .expect("parent link joins node to its BFS parent");
                    let parent_grade = state
                        .node(parent)
                        .expect("BFS parent resolved before child")
                        .grade_m;
                    parent_grade - state.link(pl).head_loss_m
                }
            };
            state.set_node(
                node,
                NodeState {
                    grade_m: grade,
                    pressure_m: grade - info.elevation_m,
                },
            );
        }

        let unresolved: Vec<NodeId> = nodes
            .iter()
            .filter(|n| !visited[n.id.index() as usize])
            .map(|n| n.id)
            .collect();
        debug!(
            resolved = order.len(),
            unresolved = unresolved.len(),
            "head propagation complete"
        );

        PropagationOutcome {
            order,
            unresolved,
            degeneracy,
        }
    }
}

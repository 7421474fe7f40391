//! Mutable computed-state overlay, separate from the immutable model.
//!
//! Keyed by the same compact handles as the arena. Node states stay `None`
//! until a solve resolves them; a node unreachable from every source simply
//! never gets one.

use hn_core::{LinkId, NodeId, Real};

use crate::model::NetworkModel;

/// Solver outputs for one node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeState {
    /// Hydraulic grade as an absolute elevation (m).
    pub grade_m: Real,
    /// Pressure head: grade minus ground elevation (m of water column).
    pub pressure_m: Real,
}

/// Solver outputs for one link.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinkState {
    /// Signed flow in l/s; positive runs `from` -> `to`.
    pub flow_lps: Real,
    pub velocity_ms: Real,
    pub head_loss_m: Real,
}

/// Computed results for a whole network.
#[derive(Debug, Clone)]
pub struct NetworkState {
    node_states: Vec<Option<NodeState>>,
    link_states: Vec<LinkState>,
}

impl NetworkState {
    /// Fresh, fully unresolved state sized for `model`.
    pub fn new(model: &NetworkModel) -> Self {
        Self {
            node_states: vec![None; model.nodes().len()],
            link_states: vec![LinkState::default(); model.links().len()],
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeState> {
        self.node_states
            .get(id.index() as usize)
            .and_then(|s| s.as_ref())
    }

    pub fn set_node(&mut self, id: NodeId, state: NodeState) {
        if let Some(slot) = self.node_states.get_mut(id.index() as usize) {
            *slot = Some(state);
        }
    }

    /// Link state for a handle (panics if out of bounds).
    pub fn link(&self, id: LinkId) -> &LinkState {
        &self.link_states[id.index() as usize]
    }

    /// Mutable link state for a handle (panics if out of bounds).
    pub fn link_mut(&mut self, id: LinkId) -> &mut LinkState {
        &mut self.link_states[id.index() as usize]
    }

    /// Nodes that a solve has resolved, in handle order.
    pub fn resolved_nodes(&self) -> impl Iterator<Item = (NodeId, &NodeState)> {
        self.node_states
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|st| (NodeId::from_index(i as u32), st)))
    }

    /// All link states in handle order.
    pub fn link_states(&self) -> &[LinkState] {
        &self.link_states
    }
}

//! Core network data structures.

use std::collections::HashMap;

use hn_core::{LinkId, NodeId, Real};
use uuid::Uuid;

/// Kind of a node in the distribution network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Large fixed-grade water source.
    Reservoir,
    /// Elevated storage tank (fixed-grade source).
    Tank,
    /// Ground-level cistern (fixed-grade source).
    Cistern,
    /// Plain junction between pipes.
    Junction,
    /// Junction with a metered consumption demand.
    Consumption,
    /// In-line valve.
    Valve,
    /// In-line pump.
    Pump,
}

impl NodeKind {
    /// Source kinds act as fixed-grade boundary conditions for propagation.
    pub fn is_source(self) -> bool {
        matches!(self, NodeKind::Reservoir | NodeKind::Tank | NodeKind::Cistern)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Reservoir => "reservoir",
            NodeKind::Tank => "tank",
            NodeKind::Cistern => "cistern",
            NodeKind::Junction => "junction",
            NodeKind::Consumption => "consumption",
            NodeKind::Valve => "valve",
            NodeKind::Pump => "pump",
        }
    }
}

/// A node: immutable input attributes only.
///
/// Computed pressure and hydraulic grade live in `NetworkState`, not here,
/// so the solver's write surface is a separate overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// Identity assigned by the caller (persistence layer owns these).
    pub external_id: Uuid,
    /// Human-facing code, unique within the network.
    pub code: String,
    pub kind: NodeKind,
    /// Ground elevation in meters above datum.
    pub elevation_m: Real,
    /// Nodal demand in l/s (zero for pass-through nodes).
    pub demand_lps: Real,
}

/// Physical pipe attributes supplied when adding a link.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeSpec {
    pub length_m: Real,
    pub diameter_mm: Real,
    pub material: String,
    pub hazen_williams_c: Real,
}

impl PipeSpec {
    /// Pipe of the given geometry with the default material (PVC, C = 150).
    pub fn new(length_m: Real, diameter_mm: Real) -> Self {
        Self {
            length_m,
            diameter_mm,
            material: "pvc".into(),
            hazen_williams_c: 150.0,
        }
    }

    pub fn with_material(mut self, material: impl Into<String>, c: Real) -> Self {
        self.material = material.into();
        self.hazen_williams_c = c;
        self
    }
}

/// A link (pipe): immutable input attributes only.
///
/// `from`/`to` define the sign convention for the computed flow: positive
/// flow runs from `from` to `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: LinkId,
    pub external_id: Uuid,
    pub code: String,
    pub from: NodeId,
    pub to: NodeId,
    pub length_m: Real,
    pub diameter_mm: Real,
    pub material: String,
    pub hazen_williams_c: Real,
}

impl Link {
    /// The endpoint opposite `node`, or None if `node` is not an endpoint.
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if node == self.from {
            Some(self.to)
        } else if node == self.to {
            Some(self.from)
        } else {
            None
        }
    }

    /// Whether this link joins the (unordered) node pair `a`-`b`.
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

/// The frozen network: a validated, immutable arena of nodes and links.
///
/// Stores:
/// - All nodes and links in vectors indexed by their compact IDs.
/// - Compact adjacency: for each node, which links are incident.
/// - Code and external-id indexes built once at construction, so per-iteration
///   lookups never scan.
#[derive(Debug, Clone)]
pub struct NetworkModel {
    pub(crate) nodes: Vec<Node>,
    pub(crate) links: Vec<Link>,

    /// Offsets for node->link adjacency: node i's links are in
    /// node_links[node_link_offsets[i]..node_link_offsets[i+1]].
    pub(crate) node_link_offsets: Vec<usize>,

    /// Flat list of link IDs incident to nodes (sorted by node ID then link ID
    /// for determinism).
    pub(crate) node_links: Vec<LinkId>,

    pub(crate) node_code_index: HashMap<String, NodeId>,
    pub(crate) link_code_index: HashMap<String, LinkId>,
    pub(crate) node_external_index: HashMap<Uuid, NodeId>,
    pub(crate) link_external_index: HashMap<Uuid, LinkId>,
}

impl NetworkModel {
    /// Return all nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return all links.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Get a node by ID (returns None if ID out of bounds).
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index() as usize)
    }

    /// Get a link by ID (returns None if ID out of bounds).
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.index() as usize)
    }

    /// Look up a node handle by its code.
    pub fn node_by_code(&self, code: &str) -> Option<NodeId> {
        self.node_code_index.get(code).copied()
    }

    /// Look up a link handle by its code.
    pub fn link_by_code(&self, code: &str) -> Option<LinkId> {
        self.link_code_index.get(code).copied()
    }

    /// Look up a node handle by its external (caller-supplied) id.
    pub fn node_by_external(&self, id: Uuid) -> Option<NodeId> {
        self.node_external_index.get(&id).copied()
    }

    /// Look up a link handle by its external (caller-supplied) id.
    pub fn link_by_external(&self, id: Uuid) -> Option<LinkId> {
        self.link_external_index.get(&id).copied()
    }

    /// Iterate over all link IDs incident to a given node.
    pub fn links_at(&self, node_id: NodeId) -> &[LinkId] {
        let idx = node_id.index() as usize;
        if idx >= self.nodes.len() {
            return &[];
        }
        let start = self.node_link_offsets[idx];
        let end = self.node_link_offsets[idx + 1];
        &self.node_links[start..end]
    }

    /// Sum of all nodal demands in l/s.
    pub fn total_demand_lps(&self) -> Real {
        self.nodes.iter().map(|n| n.demand_lps).sum()
    }

    /// Source-kind nodes (reservoirs, tanks, cisterns) in arena order.
    pub fn source_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.kind.is_source())
    }
}

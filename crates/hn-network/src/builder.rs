//! Incremental network builder.

use std::collections::HashMap;

use hn_core::{LinkId, NodeId, Real};
use uuid::Uuid;

use crate::error::NetworkError;
use crate::model::{Link, NetworkModel, Node, NodeKind, PipeSpec};
use crate::validate;

/// Builder for constructing a network incrementally.
///
/// Use `add_node` and `add_link` to build up the network, then call `build()`
/// to validate and freeze it into an immutable `NetworkModel`.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    nodes: Vec<Node>,
    links: Vec<Link>,
    next_node_id: u32,
    next_link_id: u32,
}

impl NetworkBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with a freshly generated external id and return its handle.
    pub fn add_node(
        &mut self,
        code: impl Into<String>,
        kind: NodeKind,
        elevation_m: Real,
        demand_lps: Real,
    ) -> NodeId {
        self.add_node_with_id(Uuid::new_v4(), code, kind, elevation_m, demand_lps)
    }

    /// Add a node with a caller-supplied external id and return its handle.
    pub fn add_node_with_id(
        &mut self,
        external_id: Uuid,
        code: impl Into<String>,
        kind: NodeKind,
        elevation_m: Real,
        demand_lps: Real,
    ) -> NodeId {
        let id = NodeId::from_index(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.push(Node {
            id,
            external_id,
            code: code.into(),
            kind,
            elevation_m,
            demand_lps,
        });
        id
    }

    /// Add a link between two nodes with a freshly generated external id.
    pub fn add_link(
        &mut self,
        code: impl Into<String>,
        from: NodeId,
        to: NodeId,
        spec: PipeSpec,
    ) -> LinkId {
        self.add_link_with_id(Uuid::new_v4(), code, from, to, spec)
    }

    /// Add a link with a caller-supplied external id and return its handle.
    pub fn add_link_with_id(
        &mut self,
        external_id: Uuid,
        code: impl Into<String>,
        from: NodeId,
        to: NodeId,
        spec: PipeSpec,
    ) -> LinkId {
        let id = LinkId::from_index(self.next_link_id);
        self.next_link_id += 1;
        self.links.push(Link {
            id,
            external_id,
            code: code.into(),
            from,
            to,
            length_m: spec.length_m,
            diameter_mm: spec.diameter_mm,
            material: spec.material,
            hazen_williams_c: spec.hazen_williams_c,
        });
        id
    }

    /// Build and validate the network, returning an immutable `NetworkModel`.
    ///
    /// This performs validation and constructs compact adjacency plus the
    /// code/external-id indexes.
    pub fn build(self) -> Result<NetworkModel, NetworkError> {
        validate::validate_inputs(&self.nodes, &self.links)?;

        let (node_link_offsets, node_links) = Self::build_adjacency(&self.nodes, &self.links);

        let node_code_index = self
            .nodes
            .iter()
            .map(|n| (n.code.clone(), n.id))
            .collect();
        let link_code_index = self
            .links
            .iter()
            .map(|l| (l.code.clone(), l.id))
            .collect();
        let node_external_index: HashMap<Uuid, NodeId> =
            self.nodes.iter().map(|n| (n.external_id, n.id)).collect();
        let link_external_index: HashMap<Uuid, LinkId> =
            self.links.iter().map(|l| (l.external_id, l.id)).collect();

        Ok(NetworkModel {
            nodes: self.nodes,
            links: self.links,
            node_link_offsets,
            node_links,
            node_code_index,
            link_code_index,
            node_external_index,
            link_external_index,
        })
    }

    /// Build compact adjacency lists: for each node, collect its incident links.
    fn build_adjacency(nodes: &[Node], links: &[Link]) -> (Vec<usize>, Vec<LinkId>) {
        // Group links by endpoint; a link is incident to both its endpoints
        let mut node_to_links: HashMap<NodeId, Vec<LinkId>> = HashMap::new();
        for link in links {
            node_to_links.entry(link.from).or_default().push(link.id);
            if link.to != link.from {
                node_to_links.entry(link.to).or_default().push(link.id);
            }
        }

        // Sort each node's link list for determinism
        for links_list in node_to_links.values_mut() {
            links_list.sort_by_key(|l| l.index());
        }

        // Build offsets and flat list
        let mut offsets = Vec::with_capacity(nodes.len() + 1);
        let mut flat_links = Vec::new();
        offsets.push(0);

        for node in nodes {
            if let Some(links_list) = node_to_links.get(&node.id) {
                flat_links.extend_from_slice(links_list);
            }
            offsets.push(flat_links.len());
        }

        (offsets, flat_links)
    }
}

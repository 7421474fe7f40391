//! Mesh (loop) detection over the undirected link multigraph.
//!
//! Loops are derived from topology on demand and recomputed whenever the
//! network changes; they are never authoritative state. Detection walks the
//! graph depth-first with an explicit stack (no recursion-depth limit on
//! large networks) in link-handle order, so the result is reproducible for a
//! given arena.
//!
//! Overlapping cycles are NOT reduced to a fundamental basis: a link shared
//! by two reported loops receives a correction from each of them per solver
//! pass.

use hn_core::{LinkId, LoopId, NodeId, Real};

use crate::error::NetworkError;
use crate::model::NetworkModel;

/// One link of a loop, with its traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopLink {
    pub link: LinkId,
    /// True when the loop traverses the link from its `from` node to its `to` node.
    pub forward: bool,
}

impl LoopLink {
    /// +1 for forward traversal, -1 for reverse.
    pub fn sign(self) -> Real {
        if self.forward { 1.0 } else { -1.0 }
    }
}

/// A cycle in the link graph, balanced as a unit by the loop solver.
///
/// `links[i]` connects `nodes[i]` to `nodes[(i + 1) % nodes.len()]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub id: LoopId,
    pub nodes: Vec<NodeId>,
    pub links: Vec<LoopLink>,
}

struct Frame {
    node: NodeId,
    arrived_by: Option<LinkId>,
    cursor: usize,
}

/// Find all loops of at least 3 distinct nodes.
///
/// A back edge to a node still on the traversal path closes a candidate
/// cycle; each consecutive node pair of an accepted cycle is mapped to the
/// first link (lowest handle) connecting the pair, direction-agnostic. A
/// pair with no connecting link is a topology error, never silently skipped.
pub fn find_loops(model: &NetworkModel) -> Result<Vec<Loop>, NetworkError> {
    let n = model.nodes().len();
    let mut visited = vec![false; n];
    let mut on_path = vec![false; n];
    let mut path: Vec<NodeId> = Vec::new();
    let mut loops: Vec<Loop> = Vec::new();

    for start in model.nodes() {
        if visited[start.id.index() as usize] {
            continue;
        }
        visited[start.id.index() as usize] = true;
        on_path[start.id.index() as usize] = true;
        path.push(start.id);
        let mut stack = vec![Frame {
            node: start.id,
            arrived_by: None,
            cursor: 0,
        }];

        while !stack.is_empty() {
            let (node, link_id) = {
                let frame = stack.last_mut().expect("stack is non-empty");
                let incident = model.links_at(frame.node);
                if frame.cursor >= incident.len() {
                    on_path[frame.node.index() as usize] = false;
                    path.pop();
                    stack.pop();
                    continue;
                }
                let link_id = incident[frame.cursor];
                frame.cursor += 1;
                if Some(link_id) == frame.arrived_by {
                    continue;
                }
                (frame.node, link_id)
            };

            let link = model
                .link(link_id)
                .ok_or(NetworkError::NotFound { what: "link" })?;
            let next = link
                .other_end(node)
                .ok_or(NetworkError::NotFound { what: "link endpoint" })?;
            let next_idx = next.index() as usize;

            if on_path[next_idx] {
                // Back edge: the sub-path from `next` to `node` closes a cycle.
                // Path nodes are distinct, so the length check is the >= 3
                // distinct-node rule.
                let pos = path
                    .iter()
                    .position(|&p| p == next)
                    .expect("on-path node is in path");
                if path.len() - pos >= 3 {
                    let cycle: Vec<NodeId> = path[pos..].to_vec();
                    let links = map_cycle_to_links(model, &cycle)?;
                    loops.push(Loop {
                        id: LoopId::from_index(loops.len() as u32),
                        nodes: cycle,
                        links,
                    });
                }
            } else if !visited[next_idx] {
                visited[next_idx] = true;
                on_path[next_idx] = true;
                path.push(next);
                stack.push(Frame {
                    node: next,
                    arrived_by: Some(link_id),
                    cursor: 0,
                });
            }
        }
    }

    Ok(loops)
}

/// Map each consecutive node pair of a cycle to the first link connecting it.
pub(crate) fn map_cycle_to_links(
    model: &NetworkModel,
    cycle: &[NodeId],
) -> Result<Vec<LoopLink>, NetworkError> {
    let mut links = Vec::with_capacity(cycle.len());

    for (i, &a) in cycle.iter().enumerate() {
        let b = cycle[(i + 1) % cycle.len()];

        // Adjacency is sorted by link handle, so "first" is deterministic
        let found = model
            .links_at(a)
            .iter()
            .filter_map(|&id| model.link(id))
            .find(|l| l.connects(a, b));

        match found {
            Some(l) => links.push(LoopLink {
                link: l.id,
                forward: l.from == a,
            }),
            None => {
                let code = |id: NodeId| {
                    model
                        .node(id)
                        .map(|n| n.code.clone())
                        .unwrap_or_else(|| id.to_string())
                };
                return Err(NetworkError::Topology {
                    from: code(a),
                    to: code(b),
                });
            }
        }
    }

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::NetworkBuilder;
    use crate::model::{NodeKind, PipeSpec};

    fn pipe() -> PipeSpec {
        PipeSpec::new(100.0, 100.0)
    }

    #[test]
    fn square_yields_one_loop_with_all_links() {
        // A -- B
        // |    |
        // D -- C
        let mut builder = NetworkBuilder::new();
        let a = builder.add_node("A", NodeKind::Reservoir, 100.0, 0.0);
        let b = builder.add_node("B", NodeKind::Junction, 95.0, 2.5);
        let c = builder.add_node("C", NodeKind::Junction, 92.0, 5.0);
        let d = builder.add_node("D", NodeKind::Junction, 95.0, 2.5);
        let ab = builder.add_link("AB", a, b, pipe());
        let bc = builder.add_link("BC", b, c, pipe());
        let cd = builder.add_link("CD", c, d, pipe());
        let da = builder.add_link("DA", d, a, pipe());
        let model = builder.build().unwrap();

        let loops = find_loops(&model).unwrap();
        assert_eq!(loops.len(), 1);
        let mut members: Vec<_> = loops[0].links.iter().map(|ll| ll.link).collect();
        members.sort();
        assert_eq!(members, vec![ab, bc, cd, da]);
        assert_eq!(loops[0].nodes.len(), 4);
    }

    #[test]
    fn tree_has_no_loops() {
        let mut builder = NetworkBuilder::new();
        let a = builder.add_node("A", NodeKind::Reservoir, 100.0, 0.0);
        let b = builder.add_node("B", NodeKind::Junction, 95.0, 1.0);
        let c = builder.add_node("C", NodeKind::Consumption, 90.0, 2.0);
        builder.add_link("AB", a, b, pipe());
        builder.add_link("BC", b, c, pipe());
        let model = builder.build().unwrap();

        assert!(find_loops(&model).unwrap().is_empty());
    }

    #[test]
    fn parallel_links_are_not_a_loop() {
        // Two pipes between the same pair: a 2-node cycle, below the 3-node
        // minimum.
        let mut builder = NetworkBuilder::new();
        let a = builder.add_node("A", NodeKind::Reservoir, 100.0, 0.0);
        let b = builder.add_node("B", NodeKind::Junction, 95.0, 1.0);
        builder.add_link("P-1", a, b, pipe());
        builder.add_link("P-2", a, b, pipe());
        let model = builder.build().unwrap();

        assert!(find_loops(&model).unwrap().is_empty());
    }

    #[test]
    fn loop_directions_follow_traversal() {
        let mut builder = NetworkBuilder::new();
        let a = builder.add_node("A", NodeKind::Reservoir, 100.0, 0.0);
        let b = builder.add_node("B", NodeKind::Junction, 95.0, 0.0);
        let c = builder.add_node("C", NodeKind::Junction, 92.0, 0.0);
        // AB and CA point along one orientation of the triangle, BC against it
        builder.add_link("AB", a, b, pipe());
        builder.add_link("CB", c, b, pipe());
        builder.add_link("CA", c, a, pipe());
        let model = builder.build().unwrap();

        let loops = find_loops(&model).unwrap();
        assert_eq!(loops.len(), 1);
        let lp = &loops[0];
        assert_eq!(lp.links.len(), 3);
        // Each link's direction must match the node order of the cycle
        for (i, ll) in lp.links.iter().enumerate() {
            let from = lp.nodes[i];
            let to = lp.nodes[(i + 1) % lp.nodes.len()];
            let link = model.link(ll.link).unwrap();
            if ll.forward {
                assert_eq!((link.from, link.to), (from, to));
            } else {
                assert_eq!((link.from, link.to), (to, from));
            }
        }
    }

    #[test]
    fn two_squares_share_a_link() {
        // A -- B -- E
        // |    |    |
        // D -- C -- F    BC is shared by both cycles
        let mut builder = NetworkBuilder::new();
        let a = builder.add_node("A", NodeKind::Reservoir, 100.0, 0.0);
        let b = builder.add_node("B", NodeKind::Junction, 95.0, 0.0);
        let c = builder.add_node("C", NodeKind::Junction, 92.0, 0.0);
        let d = builder.add_node("D", NodeKind::Junction, 95.0, 0.0);
        let e = builder.add_node("E", NodeKind::Junction, 94.0, 0.0);
        let f = builder.add_node("F", NodeKind::Junction, 91.0, 0.0);
        builder.add_link("AB", a, b, pipe());
        let bc = builder.add_link("BC", b, c, pipe());
        builder.add_link("CD", c, d, pipe());
        builder.add_link("DA", d, a, pipe());
        builder.add_link("BE", b, e, pipe());
        builder.add_link("EF", e, f, pipe());
        builder.add_link("FC", f, c, pipe());
        let model = builder.build().unwrap();

        let loops = find_loops(&model).unwrap();
        assert_eq!(loops.len(), 2);
        let shared_count = loops
            .iter()
            .filter(|lp| lp.links.iter().any(|ll| ll.link == bc))
            .count();
        assert_eq!(shared_count, 2);
    }

    #[test]
    fn unmapped_pair_is_a_topology_error() {
        let mut builder = NetworkBuilder::new();
        let a = builder.add_node("A", NodeKind::Reservoir, 100.0, 0.0);
        let b = builder.add_node("B", NodeKind::Junction, 95.0, 0.0);
        let c = builder.add_node("C", NodeKind::Junction, 92.0, 0.0);
        builder.add_link("AB", a, b, pipe());
        builder.add_link("BC", b, c, pipe());
        let model = builder.build().unwrap();

        // A-B-C is not a cycle: the closing pair C-A has no link
        let err = map_cycle_to_links(&model, &[a, b, c]).unwrap_err();
        assert_eq!(
            err,
            NetworkError::Topology {
                from: "C".into(),
                to: "A".into(),
            }
        );
    }
}

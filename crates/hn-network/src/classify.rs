//! Topology classification from loop coverage.

use crate::loops::Loop;
use crate::model::NetworkModel;

/// Overall topology of a network, as seen by the solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkClass {
    /// Every link belongs to at least one loop.
    Closed,
    /// No loops at all: a pure branched (tree) network.
    Open,
    /// Loops with attached open branches.
    Mixed,
}

impl NetworkClass {
    pub fn as_str(self) -> &'static str {
        match self {
            NetworkClass::Closed => "closed",
            NetworkClass::Open => "open",
            NetworkClass::Mixed => "mixed",
        }
    }
}

/// Classify a network given its detected loops.
pub fn classify(model: &NetworkModel, loops: &[Loop]) -> NetworkClass {
    if loops.is_empty() {
        return NetworkClass::Open;
    }

    let mut in_loop = vec![false; model.links().len()];
    for lp in loops {
        for ll in &lp.links {
            in_loop[ll.link.index() as usize] = true;
        }
    }

    if in_loop.iter().all(|&covered| covered) {
        NetworkClass::Closed
    } else {
        NetworkClass::Mixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::NetworkBuilder;
    use crate::loops::find_loops;
    use crate::model::{NodeKind, PipeSpec};

    fn pipe() -> PipeSpec {
        PipeSpec::new(100.0, 100.0)
    }

    #[test]
    fn classification_matches_topology() {
        // Open: a single branch
        let mut builder = NetworkBuilder::new();
        let a = builder.add_node("A", NodeKind::Reservoir, 100.0, 0.0);
        let b = builder.add_node("B", NodeKind::Consumption, 90.0, 1.0);
        builder.add_link("AB", a, b, pipe());
        let model = builder.build().unwrap();
        let loops = find_loops(&model).unwrap();
        assert_eq!(classify(&model, &loops), NetworkClass::Open);

        // Closed: a bare triangle
        let mut builder = NetworkBuilder::new();
        let a = builder.add_node("A", NodeKind::Reservoir, 100.0, 0.0);
        let b = builder.add_node("B", NodeKind::Junction, 95.0, 1.0);
        let c = builder.add_node("C", NodeKind::Junction, 92.0, 1.0);
        builder.add_link("AB", a, b, pipe());
        builder.add_link("BC", b, c, pipe());
        builder.add_link("CA", c, a, pipe());
        let model = builder.build().unwrap();
        let loops = find_loops(&model).unwrap();
        assert_eq!(classify(&model, &loops), NetworkClass::Closed);

        // Mixed: triangle with a tail
        let mut builder = NetworkBuilder::new();
        let a = builder.add_node("A", NodeKind::Reservoir, 100.0, 0.0);
        let b = builder.add_node("B", NodeKind::Junction, 95.0, 1.0);
        let c = builder.add_node("C", NodeKind::Junction, 92.0, 1.0);
        let d = builder.add_node("D", NodeKind::Consumption, 88.0, 2.0);
        builder.add_link("AB", a, b, pipe());
        builder.add_link("BC", b, c, pipe());
        builder.add_link("CA", c, a, pipe());
        builder.add_link("CD", c, d, pipe());
        let model = builder.build().unwrap();
        let loops = find_loops(&model).unwrap();
        assert_eq!(classify(&model, &loops), NetworkClass::Mixed);
    }
}

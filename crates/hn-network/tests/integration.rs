//! Integration tests for hn-network.

use hn_network::{NetworkBuilder, NetworkClass, NodeKind, PipeSpec, classify, find_loops};
use uuid::Uuid;

#[test]
fn build_and_analyze_mixed_network() {
    // Reservoir feeds a looped core with a consumption tail:
    //
    //   R -- B
    //   |    |
    //   D -- C -- T
    let mut builder = NetworkBuilder::new();
    let r = builder.add_node("R-1", NodeKind::Reservoir, 120.0, 0.0);
    let b = builder.add_node("J-B", NodeKind::Junction, 100.0, 0.0);
    let c = builder.add_node("J-C", NodeKind::Junction, 98.0, 3.0);
    let d = builder.add_node("J-D", NodeKind::Junction, 99.0, 2.0);
    let t = builder.add_node("J-T", NodeKind::Consumption, 95.0, 5.0);

    builder.add_link("P-RB", r, b, PipeSpec::new(150.0, 160.0));
    builder.add_link("P-BC", b, c, PipeSpec::new(100.0, 110.0));
    builder.add_link("P-CD", c, d, PipeSpec::new(100.0, 110.0));
    builder.add_link("P-DR", d, r, PipeSpec::new(150.0, 160.0));
    let tail = builder.add_link("P-CT", c, t, PipeSpec::new(200.0, 90.0));

    let model = builder.build().unwrap();

    assert_eq!(model.nodes().len(), 5);
    assert_eq!(model.links().len(), 5);
    assert_eq!(model.total_demand_lps(), 10.0);
    assert_eq!(model.source_nodes().count(), 1);

    let loops = find_loops(&model).unwrap();
    assert_eq!(loops.len(), 1);
    assert_eq!(loops[0].links.len(), 4);
    assert!(loops[0].links.iter().all(|ll| ll.link != tail));

    assert_eq!(classify(&model, &loops), NetworkClass::Mixed);
}

#[test]
fn external_ids_round_trip() {
    let node_ext = Uuid::new_v4();
    let link_ext = Uuid::new_v4();

    let mut builder = NetworkBuilder::new();
    let a = builder.add_node_with_id(node_ext, "A", NodeKind::Tank, 105.0, 0.0);
    let b = builder.add_node("B", NodeKind::Consumption, 90.0, 2.0);
    let l = builder.add_link_with_id(link_ext, "AB", a, b, PipeSpec::new(300.0, 110.0));
    let model = builder.build().unwrap();

    assert_eq!(model.node_by_external(node_ext), Some(a));
    assert_eq!(model.link_by_external(link_ext), Some(l));
    assert_eq!(model.node(a).unwrap().external_id, node_ext);
    assert_eq!(model.link(l).unwrap().external_id, link_ext);
}

#[test]
fn larger_grid_finds_loops_without_recursion_depth_issues() {
    // A long ladder: rung count is far beyond any recursion budget worry,
    // and every cell contributes one cycle.
    let mut builder = NetworkBuilder::new();
    let cells = 200;

    let mut top = Vec::new();
    let mut bottom = Vec::new();
    for i in 0..=cells {
        let kind = if i == 0 {
            NodeKind::Reservoir
        } else {
            NodeKind::Junction
        };
        top.push(builder.add_node(format!("T{}", i), kind, 100.0, 0.0));
        bottom.push(builder.add_node(format!("B{}", i), NodeKind::Junction, 98.0, 0.5));
    }
    for i in 0..cells {
        builder.add_link(
            format!("PT{}", i),
            top[i],
            top[i + 1],
            PipeSpec::new(50.0, 100.0),
        );
        builder.add_link(
            format!("PB{}", i),
            bottom[i],
            bottom[i + 1],
            PipeSpec::new(50.0, 100.0),
        );
    }
    for i in 0..=cells {
        builder.add_link(
            format!("PR{}", i),
            top[i],
            bottom[i],
            PipeSpec::new(20.0, 100.0),
        );
    }

    let model = builder.build().unwrap();
    let loops = find_loops(&model).unwrap();

    // One back edge (and so one loop) per ladder cell
    assert_eq!(loops.len(), cells);
    for lp in &loops {
        assert!(lp.nodes.len() >= 3);
        assert_eq!(lp.nodes.len(), lp.links.len());
    }
}

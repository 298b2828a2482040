//! End-to-end payload tests: loose JSON in, geometry out.

use selkie::{
    DiagramKind, DiagramLayout, ForceOptions, LayoutOptions, layout_force, GraphModel,
    PayloadOptions,
};
use serde_json::json;

#[test]
fn lone_root_knowledge_graph_is_left_anchored() {
    let options = LayoutOptions::default();
    let layout = selkie::layout_payload(
        DiagramKind::KnowledgeGraph,
        &json!({"nodes": [{"id": "only"}]}),
        &options,
    )
    .expect("layout");

    let DiagramLayout::Tree(tree) = layout else {
        panic!("expected the tree layout for a spanning hierarchy");
    };
    assert_eq!(tree.positions.len(), 1);
    let p = tree.positions["only"];
    assert_eq!(p.x, options.tree.padding + 50.0);
    assert_eq!(p.y, options.tree.height / 2.0);
}

#[test]
fn mind_map_children_split_the_circle() {
    let options = LayoutOptions::default();
    let layout = selkie::layout_payload(
        DiagramKind::MindMap,
        &json!({
            "nodes": [
                {"id": "r", "kind": "root", "label": "Topic"},
                {"id": "a"}, {"id": "b"}, {"id": "c"},
            ],
            "edges": [
                {"source": "r", "target": "a"},
                {"source": "r", "target": "b"},
                {"source": "r", "target": "c"},
            ],
        }),
        &options,
    )
    .expect("layout");

    let DiagramLayout::MindMap(radial) = layout else {
        panic!("expected the radial layout");
    };
    let root = radial.positions["r"];
    for id in ["a", "b", "c"] {
        let p = radial.positions[id];
        let d = ((p.x - root.x).powi(2) + (p.y - root.y).powi(2)).sqrt();
        assert!(
            (d - options.radial.level_unit_distance).abs() < 1e-9,
            "{id} not on the first ring"
        );
    }
}

#[test]
fn two_connected_nodes_converge_near_the_ideal_distance() {
    let model = GraphModel::from_payload(
        &json!({
            "nodes": [{"id": "a"}, {"id": "b"}],
            "edges": [{"source": "a", "target": "b"}],
        }),
        PayloadOptions::lenient(),
    )
    .expect("lenient");

    let opts = ForceOptions {
        min_distance: 80.0,
        ..ForceOptions::default()
    };
    let layout = layout_force(&model, &opts).expect("layout");
    let a = layout.positions["a"];
    let b = layout.positions["b"];
    let d = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
    let ideal = opts.min_distance * opts.ideal_distance_factor;
    assert!((d - ideal).abs() < 15.0, "separation {d}, ideal {ideal}");
}

#[test]
fn self_messages_bow_outward_while_normal_messages_stay_flat() {
    let layout = selkie::layout_payload(
        DiagramKind::Sequence,
        &json!({
            "participants": [{"id": "ui"}, {"id": "api"}],
            "events": [
                {"step": 1, "source": "ui", "target": "api", "label": "request"},
                {"step": 2, "source": "api", "target": "api", "label": "validate"},
            ],
        }),
        &LayoutOptions::default(),
    )
    .expect("layout");

    let DiagramLayout::Sequence(seq) = layout else {
        panic!("expected the sequence layout");
    };
    let api_x = seq
        .participants
        .iter()
        .find(|p| p.id == "api")
        .expect("api participant")
        .center_x;

    let self_msg = &seq.messages[1];
    assert!(self_msg.self_message);
    let max_x = self_msg
        .points
        .iter()
        .map(|p| p.x)
        .fold(f64::NEG_INFINITY, f64::max);
    assert!(max_x > api_x, "self-message does not bow outward");

    let normal = &seq.messages[0];
    assert_eq!(normal.points.len(), 2);
    assert_eq!(normal.points[0].y, normal.points[1].y);
}

#[test]
fn cycles_resolve_to_a_tree_not_an_error() {
    let layout = selkie::layout_payload(
        DiagramKind::KnowledgeGraph,
        &json!({
            "nodes": [{"id": "a"}, {"id": "b"}],
            "edges": [
                {"source": "a", "target": "b"},
                {"source": "b", "target": "a"},
            ],
        }),
        &LayoutOptions::default(),
    )
    .expect("layout");

    let DiagramLayout::Tree(tree) = layout else {
        panic!("a cyclic but connected graph still spans from its first node");
    };
    assert_eq!(tree.positions.len(), 2);
    assert!(tree.positions["a"].y < tree.positions["b"].y);
}

#[test]
fn disconnected_graphs_fall_back_to_the_force_layout() {
    let layout = selkie::layout_payload(
        DiagramKind::KnowledgeGraph,
        &json!({
            "nodes": [{"id": "a"}, {"id": "b"}, {"id": "c"}],
            "edges": [{"source": "a", "target": "b"}],
        }),
        &LayoutOptions::default(),
    )
    .expect("layout");

    let DiagramLayout::Force(force) = layout else {
        panic!("expected the force fallback for a non-spanning hierarchy");
    };
    // Unlike the hierarchy layouts, the force layout covers every node.
    assert_eq!(force.positions.len(), 3);
}

#[test]
fn degenerate_payloads_yield_empty_layouts_for_every_family() {
    let options = LayoutOptions::default();
    for (kind, payload) in [
        (DiagramKind::MindMap, json!({})),
        (DiagramKind::KnowledgeGraph, json!({"nodes": "not an array"})),
        (DiagramKind::Sequence, json!({"participants": []})),
        (DiagramKind::Timeline, json!(null)),
    ] {
        let layout = selkie::layout_payload(kind, &payload, &options).expect("never errors");
        match layout {
            DiagramLayout::MindMap(l) => assert!(l.positions.is_empty()),
            DiagramLayout::Tree(l) => assert!(l.positions.is_empty()),
            DiagramLayout::Force(l) => assert!(l.positions.is_empty()),
            DiagramLayout::Sequence(l) => assert!(l.participants.is_empty()),
            DiagramLayout::Timeline(l) => assert!(l.cards.is_empty()),
        }
    }
}

#[test]
fn dangling_edges_do_not_break_the_layout() {
    let layout = selkie::layout_payload(
        DiagramKind::KnowledgeGraph,
        &json!({
            "nodes": [{"id": "a"}, {"id": "b"}],
            "edges": [
                {"source": "a", "target": "b"},
                {"source": "a", "target": "ghost"},
            ],
        }),
        &LayoutOptions::default(),
    )
    .expect("layout");
    assert!(matches!(layout, DiagramLayout::Tree(_)));
}

#[test]
fn kind_strings_from_the_content_source_map_to_families() {
    assert_eq!(DiagramKind::from_type_str("mindmap"), DiagramKind::MindMap);
    assert_eq!(
        DiagramKind::from_type_str("sequenceDiagram"),
        DiagramKind::Sequence
    );
    assert_eq!(
        DiagramKind::from_type_str("timeline"),
        DiagramKind::Timeline
    );
    assert_eq!(
        DiagramKind::from_type_str("anything else"),
        DiagramKind::KnowledgeGraph
    );
}

use super::*;
use crate::grid::highlight::HighlightRange;

fn grid2() -> Grid {
    Grid::from_rows([[1, 2], [3, 4]]).unwrap()
}

fn base_scene() -> Scene {
    Scene {
        name: "t".to_string(),
        canvas: Canvas::default(),
        fps: Fps::default(),
        background: Color::BLACK,
        foreground: Color::WHITE,
        nodes: vec![
            NodeDef {
                id: "a".to_string(),
                node: Node::Matrix(MatrixNode::new(grid2())),
            },
            NodeDef {
                id: "b".to_string(),
                node: Node::Matrix(MatrixNode::new(grid2().transpose())),
            },
            NodeDef {
                id: "g".to_string(),
                node: Node::Group(GroupNode::new(["a", "b"], Arrangement::Row, 20.0)),
            },
        ],
        root: Some("g".to_string()),
        added: vec![],
        steps: vec![
            TransitionStep::appear("a"),
            TransitionStep::morph("a", "b"),
        ],
        pause_secs: 0.0,
        tail_secs: 1.0,
    }
}

fn err_text(s: &Scene) -> String {
    s.validate().unwrap_err().to_string()
}

#[test]
fn base_scene_is_valid() {
    base_scene().validate().unwrap();
}

#[test]
fn duplicate_ids_are_rejected() {
    let mut s = base_scene();
    s.nodes.push(NodeDef {
        id: "a".to_string(),
        node: Node::Label(LabelNode::new("x")),
    });
    assert!(err_text(&s).contains("duplicate node id 'a'"));
}

#[test]
fn dangling_references_are_rejected() {
    let mut s = base_scene();
    s.steps.push(TransitionStep::disappear("nope"));
    assert!(err_text(&s).contains("unknown node 'nope'"));

    let mut s = base_scene();
    s.root = Some("missing".to_string());
    assert!(err_text(&s).contains("scene root"));

    let mut s = base_scene();
    s.nodes.push(NodeDef {
        id: "arr".to_string(),
        node: Node::Arrow(ArrowNode::between(
            AnchorRef::node("a", Anchor::Right),
            AnchorRef::node("ghost", Anchor::Left),
        )),
    });
    assert!(err_text(&s).contains("arrow 'arr'"));
}

#[test]
fn node_with_two_parents_is_rejected() {
    let mut s = base_scene();
    s.nodes.push(NodeDef {
        id: "h".to_string(),
        node: Node::Group(GroupNode::new(["a"], Arrangement::Column, 0.0)),
    });
    assert!(err_text(&s).contains("belongs to both"));
}

#[test]
fn group_cycle_is_rejected() {
    let mut s = base_scene();
    s.nodes = vec![
        NodeDef {
            id: "x".to_string(),
            node: Node::Group(GroupNode::new(["y"], Arrangement::Row, 0.0)),
        },
        NodeDef {
            id: "y".to_string(),
            node: Node::Group(GroupNode::new(["x"], Arrangement::Row, 0.0)),
        },
    ];
    s.root = None;
    s.steps.clear();
    assert!(err_text(&s).contains("cycle"));
}

#[test]
fn morph_onto_itself_is_rejected() {
    let mut s = base_scene();
    s.steps.push(TransitionStep::morph("b", "b"));
    assert!(err_text(&s).contains("morph source and target"));
}

#[test]
fn out_of_range_highlight_is_rejected() {
    let mut s = base_scene();
    let Node::Matrix(m) = &mut s.nodes[0].node else {
        unreachable!()
    };
    m.coloring.ranges.push(HighlightRange::new(2, 5, Color::RED));
    assert!(err_text(&s).contains("exceeds 4 cells"));
}

#[test]
fn negative_durations_and_zero_grid_cols_are_rejected() {
    let mut s = base_scene();
    s.steps.push(TransitionStep::wait(-1.0));
    assert!(err_text(&s).contains("duration_secs"));

    let mut s = base_scene();
    s.nodes[2].node = Node::Group(GroupNode::new(["a", "b"], Arrangement::Grid { cols: 0 }, 0.0));
    assert!(err_text(&s).contains("cols >= 1"));
}

#[test]
fn non_finite_arrow_and_box_spacing_is_rejected() {
    let with = |node: Node| {
        let mut s = base_scene();
        s.nodes.push(NodeDef {
            id: "x".to_string(),
            node,
        });
        s
    };
    let arrow = || {
        ArrowNode::between(
            AnchorRef::node("a", Anchor::Right),
            AnchorRef::node("b", Anchor::Left),
        )
    };

    let mut a = arrow();
    a.buff = f64::NAN;
    assert!(err_text(&with(Node::Arrow(a))).contains("buff"));

    let mut a = arrow();
    a.buff = -1.0;
    assert!(err_text(&with(Node::Arrow(a))).contains("buff"));

    let mut a = arrow();
    a.stroke_width = 0.0;
    assert!(err_text(&with(Node::Arrow(a))).contains("stroke_width"));

    let mut b = BoxNode::new(100.0, vec![LabelNode::new("x")]);
    b.line_gap = f64::INFINITY;
    assert!(err_text(&with(Node::Box(b))).contains("line_gap"));

    let mut a = arrow();
    a.buff = 0.0;
    with(Node::Arrow(a)).validate().unwrap();
}

#[test]
fn json_round_trip_preserves_scene() {
    let mut s = base_scene();
    s.nodes.push(NodeDef {
        id: "lbl".to_string(),
        node: Node::Label(LabelNode::new("PSHUFB")),
    });
    s.nodes.push(NodeDef {
        id: "box".to_string(),
        node: Node::Box(BoxNode::new(
            2.0 * UNIT_PX,
            vec![LabelNode::new("SIMD"), LabelNode::new("shuffle")],
        )),
    });
    s.nodes.push(NodeDef {
        id: "arr".to_string(),
        node: Node::Arrow(ArrowNode::between(
            AnchorRef::node("a", Anchor::Right),
            AnchorRef::node("box", Anchor::Left),
        )),
    });
    s.steps.push(TransitionStep::wait(0.5));
    s.validate().unwrap();

    let json = s.to_json_pretty().unwrap();
    let back = Scene::from_json_str(&json).unwrap();
    assert_eq!(back, s);
}

#[test]
fn minimal_json_gets_defaults() {
    let s = Scene::from_json_str(
        r#"{
            "name": "min",
            "nodes": [{ "id": "m", "node": { "matrix": { "grid": [[1, 2, 3]] } } }],
            "steps": [{ "kind": "appear", "node": "m" }]
        }"#,
    )
    .unwrap();
    assert_eq!(s.canvas, Canvas::default());
    assert_eq!(s.fps, Fps::default());
    assert_eq!(s.background, Color::BLACK);
    assert_eq!(s.tail_secs, 1.0);
    assert_eq!(s.steps[0].duration_secs(), 1.0);
    assert_eq!(s.steps[0].ease(), Ease::Smooth);
    let Some(Node::Matrix(m)) = s.node("m") else {
        panic!("expected matrix");
    };
    assert_eq!(m.h_buff, 1.3 * UNIT_PX);
    assert_eq!(m.grid.dims(), (1, 3));
}

#[test]
fn ancestry_subtree_and_leaves_follow_draw_order() {
    let mut s = base_scene();
    s.nodes.push(NodeDef {
        id: "outer".to_string(),
        node: Node::Group(GroupNode::new(["g"], Arrangement::Column, 0.0)),
    });
    s.validate().unwrap();
    assert_eq!(s.ancestry("a"), vec!["a", "g", "outer"]);
    assert_eq!(s.subtree("outer"), vec!["outer", "g", "a", "b"]);
    assert_eq!(s.leaves("outer"), vec!["a", "b"]);
    assert_eq!(s.leaves("b"), vec!["b"]);
    assert_eq!(s.parents().get("g"), Some(&"outer"));
}

#[test]
fn step_targets_list_referenced_nodes() {
    assert_eq!(TransitionStep::morph("a", "b").targets(), vec!["a", "b"]);
    assert!(TransitionStep::wait(1.0).targets().is_empty());
    assert_eq!(TransitionStep::wait(1.0).ease(), Ease::Linear);
}

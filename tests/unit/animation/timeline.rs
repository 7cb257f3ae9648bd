use super::*;
use crate::{
    foundation::core::Fps,
    grid::model::Grid,
    scene::dsl::SceneBuilder,
    scene::model::{Arrangement, GroupNode, LabelNode, MatrixNode},
};

fn morph_scene(pause: f64) -> Scene {
    let g = Grid::sequential(3, 3, 1).unwrap();
    SceneBuilder::new("t")
        .fps(Fps::new(10, 1).unwrap())
        .pause(pause)
        .tail(0.5)
        .matrix("a", MatrixNode::new(g.clone()))
        .unwrap()
        .matrix("b", MatrixNode::new(g.transpose()))
        .unwrap()
        .label("title", LabelNode::new("Transpose"))
        .unwrap()
        .add("title")
        .appear("a")
        .morph("a", "b")
        .disappear("b")
        .build()
        .unwrap()
}

fn state<'a>(fs: &'a FrameState, id: &str) -> &'a NodeState {
    &fs.leaves[id]
}

#[test]
fn windows_are_sequential_with_pauses_and_tail() {
    let s = morph_scene(0.5);
    let tl = Timeline::compile(&s).unwrap();
    let ranges: Vec<(u64, u64)> = tl
        .windows()
        .iter()
        .map(|w| (w.range.start.0, w.range.end.0))
        .collect();
    assert_eq!(ranges, vec![(0, 10), (15, 25), (30, 40)]);
    assert_eq!(tl.total_frames(), 45);
    assert_eq!(tl.full_range().len_frames(), 45);
}

#[test]
fn zero_length_visual_steps_still_take_a_frame() {
    let mut s = morph_scene(0.0);
    s.steps = vec![TransitionStep::Appear {
        node: "a".to_string(),
        duration_secs: 0.0,
        ease: Default::default(),
    }];
    s.tail_secs = 0.0;
    let tl = Timeline::compile(&s).unwrap();
    assert_eq!(tl.windows()[0].range.len_frames(), 1);
    assert_eq!(tl.total_frames(), 1);
}

#[test]
fn appear_then_morph_then_disappear_ordering() {
    let s = morph_scene(0.0);
    let tl = Timeline::compile(&s).unwrap();

    // Before anything: only the added title shows.
    let f0 = tl.frame_state(&s, FrameIndex(0));
    assert!(matches!(state(&f0, "a"), NodeState::Appearing { .. }));
    assert_eq!(state(&f0, "b"), &NodeState::Hidden);
    assert_eq!(state(&f0, "title"), &NodeState::Visible);

    // Between appear and morph end: a is on screen and morphing into b.
    let f15 = tl.frame_state(&s, FrameIndex(15));
    assert!(matches!(state(&f15, "a"), NodeState::MorphingFrom { to, .. } if to == "b"));
    assert!(matches!(state(&f15, "b"), NodeState::MorphingTo { from, .. } if from == "a"));
    let morph = f15.morph.as_ref().unwrap();
    assert!(morph.progress > 0.0 && morph.progress < 1.0);

    // During disappear: a is gone, b fading out.
    let f25 = tl.frame_state(&s, FrameIndex(25));
    assert_eq!(state(&f25, "a"), &NodeState::Hidden);
    assert!(matches!(state(&f25, "b"), NodeState::Disappearing { .. }));
    assert!(f25.morph.is_none());

    // Tail: everything except the title has left.
    let end = tl.frame_state(&s, FrameIndex(tl.total_frames() - 1));
    assert_eq!(state(&end, "a"), &NodeState::Hidden);
    assert_eq!(state(&end, "b"), &NodeState::Hidden);
    assert_eq!(state(&end, "title"), &NodeState::Visible);
}

#[test]
fn last_frame_of_a_step_reaches_full_progress() {
    let s = morph_scene(0.0);
    let tl = Timeline::compile(&s).unwrap();
    let w = &tl.windows()[0];
    assert_eq!(w.eased_progress(w.range.start), 0.0);
    assert_eq!(w.eased_progress(FrameIndex(w.range.end.0 - 1)), 1.0);
}

#[test]
fn pause_frames_hold_the_completed_state() {
    let s = morph_scene(1.0);
    let tl = Timeline::compile(&s).unwrap();
    let gap = tl.frame_state(&s, FrameIndex(12));
    assert!(tl.active_window(FrameIndex(12)).is_none());
    assert_eq!(state(&gap, "a"), &NodeState::Visible);
    assert_eq!(state(&gap, "b"), &NodeState::Hidden);
}

#[test]
fn group_appear_reveals_children_and_child_disappear_wins() {
    let g = Grid::sequential(2, 2, 0).unwrap();
    let s = SceneBuilder::new("g")
        .fps(Fps::new(10, 1).unwrap())
        .matrix("m1", MatrixNode::new(g.clone()))
        .unwrap()
        .matrix("m2", MatrixNode::new(g))
        .unwrap()
        .group("row", GroupNode::new(["m1", "m2"], Arrangement::Row, 0.0))
        .unwrap()
        .appear("row")
        .disappear("m2")
        .build()
        .unwrap();
    let tl = Timeline::compile(&s).unwrap();

    let mid = tl.frame_state(&s, FrameIndex(5));
    assert!(matches!(state(&mid, "m1"), NodeState::Appearing { .. }));
    assert!(matches!(state(&mid, "m2"), NodeState::Appearing { .. }));
    assert!(!mid.leaves.contains_key("row"));

    let end = tl.frame_state(&s, FrameIndex(tl.total_frames() - 1));
    assert_eq!(state(&end, "m1"), &NodeState::Visible);
    assert_eq!(state(&end, "m2"), &NodeState::Hidden);
}

#[test]
fn morph_between_group_and_own_child_is_rejected() {
    let g = Grid::sequential(1, 2, 0).unwrap();
    let s = SceneBuilder::new("bad")
        .matrix("m", MatrixNode::new(g))
        .unwrap()
        .group("wrap", GroupNode::new(["m"], Arrangement::Row, 0.0))
        .unwrap()
        .appear("wrap")
        .morph("wrap", "m")
        .build()
        .unwrap();
    assert!(Timeline::compile(&s).is_err());
}

#[test]
fn morph_from_a_hidden_node_is_rejected() {
    let g = Grid::sequential(2, 2, 0).unwrap();
    let s = SceneBuilder::new("hidden")
        .matrix("a", MatrixNode::new(g.clone()))
        .unwrap()
        .matrix("b", MatrixNode::new(g.transpose()))
        .unwrap()
        .morph("a", "b")
        .build()
        .unwrap();
    let err = Timeline::compile(&s).unwrap_err().to_string();
    assert!(err.contains("'a' is not visible"), "{err}");

    let shown = SceneBuilder::new("shown")
        .matrix("a", MatrixNode::new(g.clone()))
        .unwrap()
        .matrix("b", MatrixNode::new(g.transpose()))
        .unwrap()
        .add("a")
        .morph("a", "b")
        .morph("b", "a")
        .build()
        .unwrap();
    assert_eq!(Timeline::compile(&shown).unwrap().windows().len(), 2);
}

#[test]
fn drawn_leaves_follow_the_steps() {
    let s = morph_scene(0.0);
    let tl = Timeline::compile(&s).unwrap();
    let drawn = |f: u64| -> Vec<String> {
        tl.frame_state(&s, FrameIndex(f))
            .leaves
            .into_iter()
            .filter(|(_, st)| st.is_drawn())
            .map(|(id, _)| id)
            .collect()
    };
    assert_eq!(drawn(0), ["a", "title"]);
    assert_eq!(drawn(15), ["a", "b", "title"]);
    assert_eq!(drawn(tl.total_frames() - 1), ["title"]);
}

#[test]
fn oversized_durations_are_rejected() {
    let mut s = morph_scene(0.0);
    s.steps[0] = TransitionStep::Appear {
        node: "a".to_string(),
        duration_secs: 1e300,
        ease: Default::default(),
    };
    assert!(s.validate().is_ok());
    let err = Timeline::compile(&s).unwrap_err().to_string();
    assert!(err.contains("overflows"), "{err}");

    let mut paused = morph_scene(0.0);
    paused.pause_secs = MAX_FRAMES as f64 / 20.0;
    assert!(Timeline::compile(&paused).is_err());

    let mut tail = morph_scene(0.0);
    tail.tail_secs = 1e18;
    assert!(Timeline::compile(&tail).is_err());
}

#[test]
fn long_scene_within_the_frame_limit_compiles() {
    let mut s = morph_scene(0.0);
    s.tail_secs = 3600.0;
    let tl = Timeline::compile(&s).unwrap();
    assert_eq!(tl.total_frames(), 30 + 36_000);
}

use std::collections::BTreeMap;

use crate::{
    foundation::core::{FrameIndex, FrameRange},
    foundation::error::{ScenegridError, ScenegridResult},
    scene::model::{Node, Scene, TransitionStep},
};

/// One transition step placed on the frame timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct StepWindow {
    /// Position of the step in `Scene::steps`.
    pub index: usize,
    pub step: TransitionStep,
    pub range: FrameRange,
}

impl StepWindow {
    /// Eased progress of this step at `frame`.
    pub fn eased_progress(&self, frame: FrameIndex) -> f64 {
        self.step.ease().apply(self.range.progress(frame))
    }
}

/// Sequential schedule of a scene's transition steps.
///
/// Steps run one after another, separated by `pause_secs`, followed by `tail_secs` of hold.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    windows: Vec<StepWindow>,
    total_frames: u64,
}

/// Visibility of a single node at one frame.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeState {
    Hidden,
    Visible,
    Appearing { progress: f64 },
    Disappearing { progress: f64 },
    /// Source side of an active morph.
    MorphingFrom { to: String, progress: f64 },
    /// Target side of an active morph.
    MorphingTo { from: String, progress: f64 },
}

impl NodeState {
    pub fn is_drawn(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Morph in progress at a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveMorph {
    pub from: String,
    pub to: String,
    pub progress: f64,
}

/// Resolved state of every leaf node at one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameState {
    pub leaves: BTreeMap<String, NodeState>,
    pub morph: Option<ActiveMorph>,
}

impl Timeline {
    #[tracing::instrument(skip(scene), fields(scene = %scene.name))]
    pub fn compile(scene: &Scene) -> ScenegridResult<Self> {
        let fps = scene.fps;
        let pause = fps.secs_to_frames_round(scene.pause_secs);
        let tail = fps.secs_to_frames_round(scene.tail_secs);

        let mut windows = Vec::with_capacity(scene.steps.len());
        let mut marks = initial_marks(scene);
        let mut cursor = 0u64;
        for (index, step) in scene.steps.iter().enumerate() {
            if let TransitionStep::Morph { from, to, .. } = step {
                if scene.ancestry(from).contains(&to.as_str())
                    || scene.ancestry(to).contains(&from.as_str())
                {
                    return Err(ScenegridError::validation(format!(
                        "morph '{from}' -> '{to}' links a node with its own group"
                    )));
                }
                if let Some(hidden) = scene
                    .leaves(from)
                    .into_iter()
                    .find(|leaf| !is_marked_visible(scene, &marks, leaf))
                {
                    return Err(ScenegridError::validation(format!(
                        "morph '{from}' -> '{to}' starts while '{hidden}' is not visible"
                    )));
                }
            }
            apply_completed(scene, step, &mut marks);
            if index > 0 {
                cursor = advance(cursor, pause)?;
            }
            let mut len = fps.secs_to_frames_round(step.duration_secs());
            if !matches!(step, TransitionStep::Wait { .. }) {
                len = len.max(1);
            }
            let end = advance(cursor, len)?;
            let range = FrameRange::new(FrameIndex(cursor), FrameIndex(end))?;
            windows.push(StepWindow {
                index,
                step: step.clone(),
                range,
            });
            cursor = end;
        }
        let total_frames = advance(cursor, tail)?.max(1);
        tracing::debug!(steps = windows.len(), total_frames, "compiled timeline");
        Ok(Self {
            windows,
            total_frames,
        })
    }

    pub fn windows(&self) -> &[StepWindow] {
        &self.windows
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn full_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.total_frames),
        }
    }

    /// Step running at `frame`, if any.
    pub fn active_window(&self, frame: FrameIndex) -> Option<&StepWindow> {
        self.windows.iter().find(|w| w.range.contains(frame))
    }

    /// Visibility of every leaf node at `frame`.
    ///
    /// Completed steps are replayed in order over explicit per-node marks; a leaf takes the
    /// nearest mark in its ancestry. A step running at `frame` overrides the marks of the
    /// leaves under the nodes it targets.
    pub fn frame_state(&self, scene: &Scene, frame: FrameIndex) -> FrameState {
        let mut marks = initial_marks(scene);

        let mut active: Option<&StepWindow> = None;
        for w in &self.windows {
            if frame.0 >= w.range.end.0 {
                apply_completed(scene, &w.step, &mut marks);
            } else if w.range.contains(frame) {
                active = Some(w);
                break;
            } else {
                break;
            }
        }

        let mut out = FrameState::default();
        for def in &scene.nodes {
            if matches!(def.node, Node::Group(_)) {
                continue;
            }
            let state = if is_marked_visible(scene, &marks, &def.id) {
                NodeState::Visible
            } else {
                NodeState::Hidden
            };
            out.leaves.insert(def.id.clone(), state);
        }

        if let Some(w) = active {
            let progress = w.eased_progress(frame);
            match &w.step {
                TransitionStep::Appear { node, .. } => {
                    for leaf in scene.leaves(node) {
                        out.leaves
                            .insert(leaf.to_owned(), NodeState::Appearing { progress });
                    }
                }
                TransitionStep::Disappear { node, .. } => {
                    for leaf in scene.leaves(node) {
                        out.leaves
                            .insert(leaf.to_owned(), NodeState::Disappearing { progress });
                    }
                }
                TransitionStep::Morph { from, to, .. } => {
                    for leaf in scene.leaves(from) {
                        out.leaves.insert(
                            leaf.to_owned(),
                            NodeState::MorphingFrom {
                                to: to.clone(),
                                progress,
                            },
                        );
                    }
                    for leaf in scene.leaves(to) {
                        out.leaves.insert(
                            leaf.to_owned(),
                            NodeState::MorphingTo {
                                from: from.clone(),
                                progress,
                            },
                        );
                    }
                    out.morph = Some(ActiveMorph {
                        from: from.clone(),
                        to: to.clone(),
                        progress,
                    });
                }
                TransitionStep::Wait { .. } => {}
            }
        }
        out
    }
}

/// Longest timeline a scene may compile to.
pub const MAX_FRAMES: u64 = u32::MAX as u64;

fn advance(cursor: u64, frames: u64) -> ScenegridResult<u64> {
    cursor
        .checked_add(frames)
        .filter(|&end| end <= MAX_FRAMES)
        .ok_or_else(|| {
            ScenegridError::validation(format!("scene duration overflows {MAX_FRAMES} frames"))
        })
}

fn initial_marks(scene: &Scene) -> BTreeMap<&str, bool> {
    scene.added.iter().map(|id| (id.as_str(), true)).collect()
}

/// A node takes the nearest explicit mark in its ancestry, itself first.
fn is_marked_visible(scene: &Scene, marks: &BTreeMap<&str, bool>, id: &str) -> bool {
    scene
        .ancestry(id)
        .iter()
        .find_map(|a| marks.get(a).copied())
        .unwrap_or(false)
}

fn apply_completed<'a>(
    scene: &'a Scene,
    step: &'a TransitionStep,
    marks: &mut BTreeMap<&'a str, bool>,
) {
    match step {
        TransitionStep::Appear { node, .. } => set_subtree(scene, node, true, marks),
        TransitionStep::Disappear { node, .. } => set_subtree(scene, node, false, marks),
        TransitionStep::Morph { from, to, .. } => {
            set_subtree(scene, from, false, marks);
            set_subtree(scene, to, true, marks);
        }
        TransitionStep::Wait { .. } => {}
    }
}

/// Mark `id` and drop the marks below it so descendants inherit.
fn set_subtree<'a>(
    scene: &'a Scene,
    id: &'a str,
    visible: bool,
    marks: &mut BTreeMap<&'a str, bool>,
) {
    for n in scene.subtree(id) {
        marks.remove(n);
    }
    marks.insert(id, visible);
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;

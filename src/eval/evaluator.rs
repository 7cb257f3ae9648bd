use std::collections::BTreeMap;

use crate::{
    animation::timeline::{ActiveMorph, NodeState, Timeline},
    eval::display::{DisplayList, Primitive, Role, Shape},
    eval::primitives::node_primitives,
    foundation::color::Color,
    foundation::core::FrameIndex,
    foundation::error::{ScenegridError, ScenegridResult},
    foundation::math::{lerp_f64, lerp_point},
    layout::solver::Layout,
    scene::model::{Node, Scene},
};

pub struct Evaluator;

impl Evaluator {
    /// Resolve every visible primitive of `scene` at `frame`.
    #[tracing::instrument(skip(scene, layout, timeline))]
    pub fn eval_frame(
        scene: &Scene,
        layout: &Layout,
        timeline: &Timeline,
        frame: FrameIndex,
    ) -> ScenegridResult<DisplayList> {
        if frame.0 >= timeline.total_frames() {
            return Err(ScenegridError::evaluation(format!(
                "frame {} is past the end of the scene ({} frames)",
                frame.0,
                timeline.total_frames()
            )));
        }
        let state = timeline.frame_state(scene, frame);
        let mut list = DisplayList::new(scene.canvas, scene.background);

        for def in &scene.nodes {
            if matches!(def.node, Node::Group(_)) {
                continue;
            }
            let Some(node_state) = state.leaves.get(&def.id) else {
                continue;
            };
            match node_state {
                NodeState::Hidden
                | NodeState::MorphingFrom { .. }
                | NodeState::MorphingTo { .. } => {}
                NodeState::Visible => list.items.extend(node_primitives(scene, layout, &def.id)?),
                NodeState::Appearing { progress } => {
                    for p in node_primitives(scene, layout, &def.id)? {
                        list.items.push(draw_in(p, *progress));
                    }
                }
                NodeState::Disappearing { progress } => {
                    for mut p in node_primitives(scene, layout, &def.id)? {
                        p.opacity *= 1.0 - progress;
                        list.items.push(p);
                    }
                }
            }
        }

        if let Some(morph) = &state.morph {
            list.items.extend(morph_primitives(scene, layout, morph)?);
        }
        list.items.retain(|p| !p.is_invisible());
        Ok(list)
    }
}

/// Partial "create": strokes trace along their length, text and fills fade in.
pub fn draw_in(mut p: Primitive, progress: f64) -> Primitive {
    match p.shape {
        Shape::Stroke { .. } => p.reveal *= progress,
        Shape::Text { .. } | Shape::Fill { .. } => p.opacity *= progress,
    }
    p
}

fn subtree_primitives(
    scene: &Scene,
    layout: &Layout,
    id: &str,
) -> ScenegridResult<Vec<Primitive>> {
    let mut out = Vec::new();
    for leaf in scene.leaves(id) {
        out.extend(node_primitives(scene, layout, leaf)?);
    }
    Ok(out)
}

fn morph_primitives(
    scene: &Scene,
    layout: &Layout,
    morph: &ActiveMorph,
) -> ScenegridResult<Vec<Primitive>> {
    let from = subtree_primitives(scene, layout, &morph.from)?;
    let to = subtree_primitives(scene, layout, &morph.to)?;
    Ok(morph_between(from, to, morph.progress))
}

/// Blend two primitive sets.
///
/// Primitives pair up by role, then by order within the role. Pairs interpolate; the surplus of
/// the source fades out and the surplus of the target fades in.
pub fn morph_between(from: Vec<Primitive>, to: Vec<Primitive>, t: f64) -> Vec<Primitive> {
    let mut by_role_from = BTreeMap::<Role, Vec<Primitive>>::new();
    for p in from {
        by_role_from.entry(p.role).or_default().push(p);
    }
    let mut by_role_to = BTreeMap::<Role, Vec<Primitive>>::new();
    for p in to {
        by_role_to.entry(p.role).or_default().push(p);
    }

    let mut out = Vec::new();
    for role in Role::ALL {
        let a = by_role_from.remove(&role).unwrap_or_default();
        let b = by_role_to.remove(&role).unwrap_or_default();
        let mut a = a.into_iter();
        let mut b = b.into_iter();
        loop {
            match (a.next(), b.next()) {
                (Some(pa), Some(pb)) => blend_pair(pa, pb, t, &mut out),
                (Some(mut pa), None) => {
                    pa.opacity *= 1.0 - t;
                    out.push(pa);
                }
                (None, Some(mut pb)) => {
                    pb.opacity *= t;
                    out.push(pb);
                }
                (None, None) => break,
            }
        }
    }
    out
}

fn blend_pair(a: Primitive, b: Primitive, t: f64, out: &mut Vec<Primitive>) {
    let shape = match (&a.shape, &b.shape) {
        (
            Shape::Text {
                center: ca,
                text: ta,
                font_size: fa,
            },
            Shape::Text {
                center: cb,
                text: tb,
                font_size: fb,
            },
        ) => Some(Shape::Text {
            center: lerp_point(*ca, *cb, t),
            text: if t < 0.5 { ta.clone() } else { tb.clone() },
            font_size: lerp_f64(*fa, *fb, t),
        }),
        (
            Shape::Stroke {
                points: pa,
                width: wa,
                closed: ka,
            },
            Shape::Stroke {
                points: pb,
                width: wb,
                closed: kb,
            },
        ) if pa.len() == pb.len() && ka == kb => Some(Shape::Stroke {
            points: pa
                .iter()
                .zip(pb)
                .map(|(p, q)| lerp_point(*p, *q, t))
                .collect(),
            width: lerp_f64(*wa, *wb, t),
            closed: *ka,
        }),
        (Shape::Fill { points: pa }, Shape::Fill { points: pb }) if pa.len() == pb.len() => {
            Some(Shape::Fill {
                points: pa
                    .iter()
                    .zip(pb)
                    .map(|(p, q)| lerp_point(*p, *q, t))
                    .collect(),
            })
        }
        _ => None,
    };

    match shape {
        Some(shape) => out.push(Primitive {
            node: b.node,
            role: b.role,
            shape,
            color: Color::lerp(a.color, b.color, t),
            opacity: lerp_f64(a.opacity, b.opacity, t),
            reveal: lerp_f64(a.reveal, b.reveal, t),
        }),
        None => {
            // Incompatible outlines crossfade in place.
            let mut a = a;
            let mut b = b;
            a.opacity *= 1.0 - t;
            b.opacity *= t;
            out.push(a);
            out.push(b);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;

use crate::{
    eval::display::{Primitive, Role, Shape},
    foundation::color::Color,
    foundation::core::{Point, Rect, Vec2},
    foundation::error::{ScenegridError, ScenegridResult},
    layout::solver::{ArrowPath, Layout, MatrixMetrics, text_size},
    scene::model::{ArrowNode, BoxNode, LabelNode, MatrixNode, Node, Scene},
};

/// Stroke width of matrix brackets.
pub const BRACKET_WIDTH: f64 = 3.0;
/// Stroke width of row/column outlines and box frames.
pub const OUTLINE_WIDTH: f64 = 3.0;

/// Fully drawn primitives of leaf node `id`, in paint order.
pub fn node_primitives(
    scene: &Scene,
    layout: &Layout,
    id: &str,
) -> ScenegridResult<Vec<Primitive>> {
    let node = scene
        .node(id)
        .ok_or_else(|| ScenegridError::evaluation(format!("unknown node '{id}'")))?;
    let rect = layout
        .rect(id)
        .ok_or_else(|| ScenegridError::evaluation(format!("node '{id}' was not laid out")))?;
    let fg = scene.foreground;
    let mut out = Vec::new();
    match node {
        Node::Matrix(m) => matrix(id, m, rect, layout, fg, &mut out)?,
        Node::Label(l) => out.push(text(id, Role::Label, l, rect.center(), fg)),
        Node::Box(b) => boxed(id, b, rect, fg, &mut out),
        Node::Arrow(a) => {
            let path = layout.arrow(id).ok_or_else(|| {
                ScenegridError::evaluation(format!("arrow '{id}' has no resolved path"))
            })?;
            arrow(id, a, path, fg, &mut out);
        }
        Node::Group(_) => {}
    }
    Ok(out)
}

fn text(id: &str, role: Role, l: &LabelNode, center: Point, fg: Color) -> Primitive {
    Primitive::new(
        id,
        role,
        Shape::Text {
            center,
            text: l.text.clone(),
            font_size: l.font_size,
        },
        l.color.unwrap_or(fg),
    )
}

fn matrix(
    id: &str,
    m: &MatrixNode,
    rect: Rect,
    layout: &Layout,
    fg: Color,
    out: &mut Vec<Primitive>,
) -> ScenegridResult<()> {
    let metrics = layout
        .matrix_metrics(id)
        .unwrap_or_else(|| MatrixMetrics::of(m));
    let colors = m.coloring.resolve(m.grid.len(), fg);
    for (k, (cell, color)) in m.grid.cells().iter().zip(colors).enumerate() {
        let cell_rect = layout.cell_rect(id, k).ok_or_else(|| {
            ScenegridError::evaluation(format!("matrix '{id}' cell {k} has no geometry"))
        })?;
        out.push(Primitive::new(
            id,
            Role::Entry,
            Shape::Text {
                center: cell_rect.center(),
                text: cell.label(),
                font_size: m.font_size,
            },
            color,
        ));
    }

    let bracket = m.bracket_color.unwrap_or(fg);
    let arm = metrics.bracket_pad * 0.8;
    let (x0, x1, y0, y1) = (rect.x0, rect.x1, rect.y0, rect.y1);
    for points in [
        vec![
            Point::new(x0 + arm, y0),
            Point::new(x0, y0),
            Point::new(x0, y1),
            Point::new(x0 + arm, y1),
        ],
        vec![
            Point::new(x1 - arm, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x1 - arm, y1),
        ],
    ] {
        out.push(Primitive::new(
            id,
            Role::Bracket,
            Shape::Stroke {
                points,
                width: BRACKET_WIDTH,
                closed: false,
            },
            bracket,
        ));
    }

    for o in &m.outlines {
        let cells = o.selection.flat_indices(&m.grid)?;
        let mut bounds: Option<Rect> = None;
        for k in cells {
            if let Some(r) = layout.cell_rect(id, k) {
                bounds = Some(bounds.map_or(r, |b| b.union(r)));
            }
        }
        let Some(b) = bounds else { continue };
        let b = b.inflate(OUTLINE_WIDTH, OUTLINE_WIDTH);
        out.push(Primitive::new(
            id,
            Role::Outline,
            Shape::Stroke {
                points: rect_points(b),
                width: OUTLINE_WIDTH,
                closed: true,
            },
            o.color,
        ));
    }
    Ok(())
}

fn boxed(id: &str, b: &BoxNode, rect: Rect, fg: Color, out: &mut Vec<Primitive>) {
    out.push(Primitive::new(
        id,
        Role::Frame,
        Shape::Stroke {
            points: rect_points(rect),
            width: OUTLINE_WIDTH,
            closed: true,
        },
        b.stroke.unwrap_or(fg),
    ));

    let heights: Vec<f64> = b
        .lines
        .iter()
        .map(|l| text_size(&l.text, l.font_size).height)
        .collect();
    let total = heights.iter().sum::<f64>() + b.lines.len().saturating_sub(1) as f64 * b.line_gap;
    let cx = rect.center().x;
    let mut y = rect.center().y - total * 0.5;
    for (line, h) in b.lines.iter().zip(heights) {
        out.push(text(id, Role::Label, line, Point::new(cx, y + h * 0.5), fg));
        y += h + b.line_gap;
    }
}

fn arrow(id: &str, a: &ArrowNode, path: ArrowPath, fg: Color, out: &mut Vec<Primitive>) {
    let color = a.color.unwrap_or(fg);
    let len = path.length();
    if len <= f64::EPSILON {
        return;
    }
    let dir = (path.end - path.start) / len;
    let normal = Vec2::new(-dir.y, dir.x);
    let tip_len = (a.stroke_width * 5.0).max(12.0).min(len * 0.5);
    let tip_half = tip_len * 0.5;
    let base = path.end - dir * tip_len;

    out.push(Primitive::new(
        id,
        Role::Arrow,
        Shape::Stroke {
            points: vec![path.start, base],
            width: a.stroke_width,
            closed: false,
        },
        color,
    ));
    out.push(Primitive::new(
        id,
        Role::ArrowTip,
        Shape::Fill {
            points: vec![path.end, base + normal * tip_half, base - normal * tip_half],
        },
        color,
    ));
}

pub(crate) fn rect_points(r: Rect) -> Vec<Point> {
    vec![
        Point::new(r.x0, r.y0),
        Point::new(r.x1, r.y0),
        Point::new(r.x1, r.y1),
        Point::new(r.x0, r.y1),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/eval/primitives.rs"]
mod tests;

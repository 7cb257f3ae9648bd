use std::collections::BTreeMap;

use crate::{
    foundation::core::{Canvas, Point, Rect, Size, Vec2},
    foundation::error::{ScenegridError, ScenegridResult},
    scene::model::{
        Anchor, AnchorRef, Arrangement, ArrowNode, BoxNode, MatrixNode, Node, Scene, UNIT_PX,
    },
};

/// Advance of one character as a fraction of the font size.
pub const CHAR_ADVANCE_EM: f64 = 0.6;
/// Line box height as a fraction of the font size.
pub const LINE_HEIGHT_EM: f64 = 1.2;
/// Height reserved for an arrow laid out inside a group.
pub const ARROW_BAND: f64 = 0.35 * UNIT_PX;

/// Deterministic text box: no font is consulted.
pub fn text_size(text: &str, font_size: f64) -> Size {
    let chars = text.chars().count() as f64;
    Size::new(
        chars * font_size * CHAR_ADVANCE_EM,
        font_size * LINE_HEIGHT_EM,
    )
}

/// Cell pitch and bracket margin of a matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatrixMetrics {
    pub rows: usize,
    pub cols: usize,
    /// Horizontal distance between neighbouring column centers.
    pub pitch_x: f64,
    /// Vertical distance between neighbouring row centers.
    pub pitch_y: f64,
    /// Space between the brackets and the outer columns.
    pub bracket_pad: f64,
}

impl MatrixMetrics {
    pub fn of(m: &MatrixNode) -> Self {
        let widest = m
            .grid
            .cells()
            .iter()
            .map(|c| text_size(&c.label(), m.font_size).width)
            .fold(0.0, f64::max);
        let (rows, cols) = m.grid.dims();
        Self {
            rows,
            cols,
            pitch_x: m.h_buff.max(widest + m.font_size * 0.5),
            pitch_y: m.v_buff.max(m.font_size * LINE_HEIGHT_EM),
            bracket_pad: m.font_size * 0.5,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(
            self.cols as f64 * self.pitch_x + 2.0 * self.bracket_pad,
            self.rows as f64 * self.pitch_y,
        )
    }
}

/// Resolved arrow endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowPath {
    pub start: Point,
    pub end: Point,
}

impl ArrowPath {
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }
}

/// Placed geometry of every node of a scene, in canvas pixels (origin top-left, y down).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    rects: BTreeMap<String, Rect>,
    arrows: BTreeMap<String, ArrowPath>,
    matrices: BTreeMap<String, MatrixMetrics>,
}

impl Layout {
    pub fn rect(&self, id: &str) -> Option<Rect> {
        self.rects.get(id).copied()
    }

    pub fn arrow(&self, id: &str) -> Option<ArrowPath> {
        self.arrows.get(id).copied()
    }

    pub fn matrix_metrics(&self, id: &str) -> Option<MatrixMetrics> {
        self.matrices.get(id).copied()
    }

    /// Rect of cell `flat_index` of matrix `id`.
    pub fn cell_rect(&self, id: &str, flat_index: usize) -> Option<Rect> {
        let m = self.matrices.get(id)?;
        let bounds = self.rects.get(id)?;
        if flat_index >= m.rows * m.cols {
            return None;
        }
        let (row, col) = (flat_index / m.cols, flat_index % m.cols);
        let x0 = bounds.x0 + m.bracket_pad + col as f64 * m.pitch_x;
        let y0 = bounds.y0 + row as f64 * m.pitch_y;
        Some(Rect::new(x0, y0, x0 + m.pitch_x, y0 + m.pitch_y))
    }

    /// Anchor point on the placed bounds of `id`.
    pub fn anchor_point(&self, id: &str, anchor: Anchor) -> Option<Point> {
        self.rect(id).map(|r| anchor_on(r, anchor))
    }
}

pub fn anchor_on(r: Rect, anchor: Anchor) -> Point {
    let c = r.center();
    match anchor {
        Anchor::Center => c,
        Anchor::Left => Point::new(r.x0, c.y),
        Anchor::Right => Point::new(r.x1, c.y),
        Anchor::Top => Point::new(c.x, r.y0),
        Anchor::Bottom => Point::new(c.x, r.y1),
    }
}

/// Measure and place every node of `scene`.
///
/// Parentless nodes are centered on the canvas and their subtrees arranged inside them. Arrows
/// outside any group are resolved last, in node order, from the anchors of placed nodes.
pub fn solve_layout(scene: &Scene) -> ScenegridResult<Layout> {
    let parents = scene.parents();
    let mut sizes = BTreeMap::<&str, Size>::new();
    let mut layout = Layout::default();

    let mut free_arrows = Vec::new();
    for def in &scene.nodes {
        if parents.contains_key(def.id.as_str()) {
            continue;
        }
        if let Node::Arrow(a) = &def.node {
            free_arrows.push((def.id.as_str(), a));
            continue;
        }
        let size = measure(scene, &def.id, &mut sizes)?;
        let origin = centered_origin(scene.canvas, size);
        place(scene, &def.id, origin, &mut sizes, &mut layout)?;
    }

    for (id, a) in free_arrows {
        let path = resolve_free_arrow(scene.canvas, id, a, &layout)?;
        layout.rects.insert(id.to_owned(), path.bounds());
        layout.arrows.insert(id.to_owned(), path);
    }

    tracing::debug!(
        scene = %scene.name,
        placed = layout.rects.len(),
        arrows = layout.arrows.len(),
        "solved layout"
    );
    Ok(layout)
}

fn centered_origin(canvas: Canvas, size: Size) -> Point {
    let c = canvas.center();
    Point::new(c.x - size.width * 0.5, c.y - size.height * 0.5)
}

/// Intrinsic size of `id`, memoized in `sizes`.
fn measure<'a>(
    scene: &'a Scene,
    id: &'a str,
    sizes: &mut BTreeMap<&'a str, Size>,
) -> ScenegridResult<Size> {
    if let Some(s) = sizes.get(id) {
        return Ok(*s);
    }
    let node = scene
        .node(id)
        .ok_or_else(|| ScenegridError::layout(format!("unknown node '{id}'")))?;
    let size = match node {
        Node::Matrix(m) => MatrixMetrics::of(m).size(),
        Node::Label(l) => text_size(&l.text, l.font_size),
        Node::Box(b) => box_size(b),
        Node::Arrow(a) => Size::new(a.length, ARROW_BAND),
        Node::Group(g) => {
            let mut child_sizes = Vec::with_capacity(g.children.len());
            for child in &g.children {
                child_sizes.push(measure(scene, child, sizes)?);
            }
            arranged_size(g.arrangement, g.spacing, &child_sizes)
        }
    };
    sizes.insert(id, size);
    Ok(size)
}

fn box_size(b: &BoxNode) -> Size {
    let text_h: f64 = b
        .lines
        .iter()
        .map(|l| text_size(&l.text, l.font_size).height)
        .sum::<f64>()
        + b.lines.len().saturating_sub(1) as f64 * b.line_gap;
    let text_w = b
        .lines
        .iter()
        .map(|l| text_size(&l.text, l.font_size).width)
        .fold(0.0, f64::max);
    // Text that does not fit widens the frame rather than spilling out.
    let side = b.side.max(text_w).max(text_h);
    Size::new(side, side)
}

/// Per-column widths and per-row heights of a grid arrangement.
fn grid_tracks(cols: usize, sizes: &[Size]) -> (Vec<f64>, Vec<f64>) {
    let cols = cols.max(1);
    let rows = sizes.len().div_ceil(cols);
    let mut widths = vec![0.0f64; cols.min(sizes.len().max(1))];
    let mut heights = vec![0.0f64; rows];
    for (i, s) in sizes.iter().enumerate() {
        let (r, c) = (i / cols, i % cols);
        widths[c] = widths[c].max(s.width);
        heights[r] = heights[r].max(s.height);
    }
    (widths, heights)
}

fn sum_with_gaps(parts: impl Iterator<Item = f64>, spacing: f64) -> f64 {
    let mut n = 0usize;
    let mut total = 0.0;
    for p in parts {
        total += p;
        n += 1;
    }
    total + n.saturating_sub(1) as f64 * spacing
}

fn arranged_size(arrangement: Arrangement, spacing: f64, sizes: &[Size]) -> Size {
    if sizes.is_empty() {
        return Size::ZERO;
    }
    match arrangement {
        Arrangement::Row => Size::new(
            sum_with_gaps(sizes.iter().map(|s| s.width), spacing),
            sizes.iter().map(|s| s.height).fold(0.0, f64::max),
        ),
        Arrangement::Column => Size::new(
            sizes.iter().map(|s| s.width).fold(0.0, f64::max),
            sum_with_gaps(sizes.iter().map(|s| s.height), spacing),
        ),
        Arrangement::Grid { cols } => {
            let (widths, heights) = grid_tracks(cols, sizes);
            Size::new(
                sum_with_gaps(widths.into_iter(), spacing),
                sum_with_gaps(heights.into_iter(), spacing),
            )
        }
    }
}

/// Child origins relative to the group's top-left corner; children are centered on the cross
/// axis (and inside their cell for grids).
fn arranged_offsets(
    arrangement: Arrangement,
    spacing: f64,
    group: Size,
    sizes: &[Size],
) -> Vec<Vec2> {
    match arrangement {
        Arrangement::Row => {
            let mut x = 0.0;
            sizes
                .iter()
                .map(|s| {
                    let o = Vec2::new(x, (group.height - s.height) * 0.5);
                    x += s.width + spacing;
                    o
                })
                .collect()
        }
        Arrangement::Column => {
            let mut y = 0.0;
            sizes
                .iter()
                .map(|s| {
                    let o = Vec2::new((group.width - s.width) * 0.5, y);
                    y += s.height + spacing;
                    o
                })
                .collect()
        }
        Arrangement::Grid { cols } => {
            let cols = cols.max(1);
            let (widths, heights) = grid_tracks(cols, sizes);
            let col_x: Vec<f64> = prefix_starts(&widths, spacing);
            let row_y: Vec<f64> = prefix_starts(&heights, spacing);
            sizes
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let (r, c) = (i / cols, i % cols);
                    Vec2::new(
                        col_x[c] + (widths[c] - s.width) * 0.5,
                        row_y[r] + (heights[r] - s.height) * 0.5,
                    )
                })
                .collect()
        }
    }
}

fn prefix_starts(tracks: &[f64], spacing: f64) -> Vec<f64> {
    let mut at = 0.0;
    tracks
        .iter()
        .map(|t| {
            let start = at;
            at += t + spacing;
            start
        })
        .collect()
}

fn place<'a>(
    scene: &'a Scene,
    id: &'a str,
    origin: Point,
    sizes: &mut BTreeMap<&'a str, Size>,
    layout: &mut Layout,
) -> ScenegridResult<()> {
    let size = measure(scene, id, sizes)?;
    let rect = Rect::from_origin_size(origin, size);
    layout.rects.insert(id.to_owned(), rect);

    let node = scene
        .node(id)
        .ok_or_else(|| ScenegridError::layout(format!("unknown node '{id}'")))?;
    match node {
        Node::Matrix(m) => {
            layout.matrices.insert(id.to_owned(), MatrixMetrics::of(m));
        }
        Node::Arrow(_) => {
            let y = rect.center().y;
            layout.arrows.insert(
                id.to_owned(),
                ArrowPath {
                    start: Point::new(rect.x0, y),
                    end: Point::new(rect.x1, y),
                },
            );
        }
        Node::Group(g) => {
            let mut child_sizes = Vec::with_capacity(g.children.len());
            for child in &g.children {
                child_sizes.push(measure(scene, child, sizes)?);
            }
            let offsets = arranged_offsets(g.arrangement, g.spacing, size, &child_sizes);
            for (child, off) in g.children.iter().zip(offsets) {
                place(scene, child, origin + off, sizes, layout)?;
            }
        }
        Node::Label(_) | Node::Box(_) => {}
    }
    Ok(())
}

fn resolve_end(
    canvas: Canvas,
    arrow_id: &str,
    end: &AnchorRef,
    layout: &Layout,
) -> ScenegridResult<Point> {
    match end {
        AnchorRef::Node { node, anchor } => layout.anchor_point(node, *anchor).ok_or_else(|| {
            ScenegridError::layout(format!(
                "arrow '{arrow_id}' anchors to '{node}', which is not placed yet"
            ))
        }),
        AnchorRef::Point { x, y } => Ok(canvas.center() + Vec2::new(*x, *y)),
    }
}

fn resolve_free_arrow(
    canvas: Canvas,
    id: &str,
    a: &ArrowNode,
    layout: &Layout,
) -> ScenegridResult<ArrowPath> {
    let from = resolve_end(canvas, id, &a.from, layout)?;
    let to = resolve_end(canvas, id, &a.to, layout)?;
    let d = to - from;
    let len = d.hypot();
    if len <= 2.0 * a.buff {
        // Anchors too close to leave a gap on both sides: draw the bare segment.
        return Ok(ArrowPath {
            start: from,
            end: to,
        });
    }
    let u = d / len;
    Ok(ArrowPath {
        start: from + u * a.buff,
        end: to - u * a.buff,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    animation::timeline::Timeline,
    foundation::color::Color,
    foundation::core::{Canvas, Fps},
    foundation::error::{ScenegridError, ScenegridResult},
    grid::highlight::{HighlightRange, Outline, Selection},
    grid::model::Grid,
    scene::model::{
        AnchorRef, Arrangement, ArrowNode, BoxNode, GroupNode, LabelNode, MatrixNode, Node,
        NodeDef, Scene, TransitionStep,
    },
};

/// Id of the group created by [`construct`].
pub const CONSTRUCT_ROOT_ID: &str = "root";

pub struct SceneBuilder {
    name: String,
    canvas: Canvas,
    fps: Fps,
    background: Color,
    foreground: Color,
    nodes: Vec<NodeDef>,
    root: Option<String>,
    added: Vec<String>,
    steps: Vec<TransitionStep>,
    pause_secs: f64,
    tail_secs: f64,
}

impl SceneBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            canvas: Canvas::default(),
            fps: Fps::default(),
            background: Color::BLACK,
            foreground: Color::WHITE,
            nodes: Vec::new(),
            root: None,
            added: Vec::new(),
            steps: Vec::new(),
            pause_secs: 0.0,
            tail_secs: 1.0,
        }
    }

    pub fn canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn fps(mut self, fps: Fps) -> Self {
        self.fps = fps;
        self
    }

    pub fn background(mut self, c: Color) -> Self {
        self.background = c;
        self
    }

    pub fn foreground(mut self, c: Color) -> Self {
        self.foreground = c;
        self
    }

    /// Pause inserted between consecutive transition steps.
    pub fn pause(mut self, secs: f64) -> Self {
        self.pause_secs = secs;
        self
    }

    /// Hold after the last transition step.
    pub fn tail(mut self, secs: f64) -> Self {
        self.tail_secs = secs;
        self
    }

    pub fn node(mut self, id: impl Into<String>, node: Node) -> ScenegridResult<Self> {
        let id = id.into();
        if self.nodes.iter().any(|n| n.id == id) {
            return Err(ScenegridError::validation(format!(
                "duplicate node id '{id}'"
            )));
        }
        self.nodes.push(NodeDef { id, node });
        Ok(self)
    }

    pub fn matrix(self, id: impl Into<String>, m: MatrixNode) -> ScenegridResult<Self> {
        self.node(id, Node::Matrix(m))
    }

    pub fn label(self, id: impl Into<String>, l: LabelNode) -> ScenegridResult<Self> {
        self.node(id, Node::Label(l))
    }

    pub fn boxed(self, id: impl Into<String>, b: BoxNode) -> ScenegridResult<Self> {
        self.node(id, Node::Box(b))
    }

    pub fn arrow(self, id: impl Into<String>, a: ArrowNode) -> ScenegridResult<Self> {
        self.node(id, Node::Arrow(a))
    }

    pub fn group(self, id: impl Into<String>, g: GroupNode) -> ScenegridResult<Self> {
        self.node(id, Node::Group(g))
    }

    /// Add a matrix with default spacing for `grid`.
    pub fn grid(self, id: impl Into<String>, grid: Grid) -> ScenegridResult<Self> {
        self.matrix(id, MatrixNode::new(grid))
    }

    /// Paint cells `[start, stop)` of matrix `id`.
    pub fn highlight(
        self,
        id: &str,
        start: usize,
        stop: usize,
        color: Color,
    ) -> ScenegridResult<Self> {
        self.edit_matrix(id, |m| m.highlight(start, stop, color))
    }

    pub fn cycle(
        self,
        id: &str,
        palette: impl IntoIterator<Item = Color>,
    ) -> ScenegridResult<Self> {
        self.edit_matrix(id, |m| m.cycle(palette))
    }

    pub fn tint(self, id: &str, color: Color) -> ScenegridResult<Self> {
        self.edit_matrix(id, |m| m.tint(color))
    }

    pub fn outline(self, id: &str, selection: Selection, color: Color) -> ScenegridResult<Self> {
        self.edit_matrix(id, |m| m.outline(selection, color))
    }

    /// Group `children` under a new node `id` laid out with `arrangement`.
    pub fn arrange<I, S>(
        self,
        id: impl Into<String>,
        children: I,
        arrangement: Arrangement,
        spacing: f64,
    ) -> ScenegridResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group(id, GroupNode::new(children, arrangement, spacing))
    }

    fn edit_matrix(
        mut self,
        id: &str,
        f: impl FnOnce(MatrixBuilder) -> MatrixBuilder,
    ) -> ScenegridResult<Self> {
        let Some(def) = self.nodes.iter_mut().find(|n| n.id == id) else {
            return Err(ScenegridError::validation(format!(
                "unknown matrix '{id}'"
            )));
        };
        let kind = def.node.kind_name();
        let Node::Matrix(m) = &mut def.node else {
            return Err(ScenegridError::validation(format!(
                "node '{id}' is a {kind}, not a matrix"
            )));
        };
        let edited = f(MatrixBuilder { node: m.clone() }).build()?;
        *m = edited;
        Ok(self)
    }

    /// Center `id` on the canvas.
    pub fn root(mut self, id: impl Into<String>) -> Self {
        self.root = Some(id.into());
        self
    }

    /// Show `id` from the first frame without an entrance.
    pub fn add(mut self, id: impl Into<String>) -> Self {
        self.added.push(id.into());
        self
    }

    pub fn step(mut self, step: TransitionStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn appear(self, id: impl Into<String>) -> Self {
        self.step(TransitionStep::appear(id))
    }

    pub fn morph(self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.step(TransitionStep::morph(from, to))
    }

    pub fn disappear(self, id: impl Into<String>) -> Self {
        self.step(TransitionStep::disappear(id))
    }

    pub fn wait(self, secs: f64) -> Self {
        self.step(TransitionStep::wait(secs))
    }

    pub fn build(self) -> ScenegridResult<Scene> {
        let scene = Scene {
            name: self.name,
            canvas: self.canvas,
            fps: self.fps,
            background: self.background,
            foreground: self.foreground,
            nodes: self.nodes,
            root: self.root,
            added: self.added,
            steps: self.steps,
            pause_secs: self.pause_secs,
            tail_secs: self.tail_secs,
        };
        scene.validate()?;
        tracing::debug!(
            scene = %scene.name,
            nodes = scene.nodes.len(),
            steps = scene.steps.len(),
            "built scene"
        );
        Ok(scene)
    }
}

pub struct MatrixBuilder {
    node: MatrixNode,
}

impl MatrixBuilder {
    pub fn new(grid: Grid) -> Self {
        Self {
            node: MatrixNode::new(grid),
        }
    }

    pub fn h_buff(mut self, px: f64) -> Self {
        self.node.h_buff = px;
        self
    }

    pub fn v_buff(mut self, px: f64) -> Self {
        self.node.v_buff = px;
        self
    }

    pub fn font_size(mut self, px: f64) -> Self {
        self.node.font_size = px;
        self
    }

    /// Whole-matrix entry color.
    pub fn tint(mut self, c: Color) -> Self {
        self.node.coloring.tint = Some(c);
        self.node.bracket_color = Some(c);
        self
    }

    /// Color entries by `flat_index % palette.len()`.
    pub fn cycle(mut self, palette: impl IntoIterator<Item = Color>) -> Self {
        self.node.coloring.cycle = palette.into_iter().collect();
        self
    }

    /// Paint flat cells `[start, stop)`.
    pub fn highlight(mut self, start: usize, stop: usize, color: Color) -> Self {
        self.node
            .coloring
            .ranges
            .push(HighlightRange::new(start, stop, color));
        self
    }

    pub fn outline(mut self, selection: Selection, color: Color) -> Self {
        self.node.outlines.push(Outline { selection, color });
        self
    }

    pub fn build(self) -> ScenegridResult<MatrixNode> {
        self.node.coloring.validate_for(self.node.grid.len())?;
        for o in &self.node.outlines {
            o.selection.flat_indices(&self.node.grid)?;
        }
        Ok(self.node)
    }
}

/// Build a scene from grids, per-grid highlights, auxiliary nodes, one arrangement and a
/// transition sequence.
///
/// Grids (in order) followed by the auxiliary nodes become the children of a root group laid
/// out with `arrangement` and `spacing`. Anchored arrows and nodes already owned by an auxiliary
/// group stay out of the root. With no transitions the root is shown statically; otherwise every
/// subtree no transition touches is shown statically and the rest enter and leave as the steps
/// dictate. The timeline is compiled before returning, so a morph from a hidden node fails here.
pub fn construct(
    name: impl Into<String>,
    grids: Vec<(String, Grid)>,
    highlights: BTreeMap<String, Vec<HighlightRange>>,
    auxiliary: Vec<NodeDef>,
    arrangement: Arrangement,
    spacing: f64,
    transitions: Vec<TransitionStep>,
) -> ScenegridResult<Scene> {
    if grids.is_empty() {
        return Err(ScenegridError::validation(
            "construct needs at least one grid",
        ));
    }
    for key in highlights.keys() {
        if !grids.iter().any(|(id, _)| id == key) {
            return Err(ScenegridError::validation(format!(
                "highlights reference unknown grid '{key}'"
            )));
        }
    }

    let owned: BTreeSet<String> = auxiliary
        .iter()
        .filter_map(|def| match &def.node {
            Node::Group(g) => Some(g.children.iter().cloned()),
            _ => None,
        })
        .flatten()
        .collect();

    let mut b = SceneBuilder::new(name);
    let mut children = Vec::<String>::new();
    for (id, grid) in grids {
        let mut m = MatrixBuilder::new(grid);
        for r in highlights.get(&id).into_iter().flatten() {
            m = m.highlight(r.start, r.stop, r.color);
        }
        b = b.matrix(id.clone(), m.build()?)?;
        if !owned.contains(&id) {
            children.push(id);
        }
    }
    for def in auxiliary {
        if !is_anchored(&def.node) && !owned.contains(&def.id) {
            children.push(def.id.clone());
        }
        b = b.node(def.id, def.node)?;
    }
    let anchored: Vec<String> = b
        .nodes
        .iter()
        .filter(|n| is_anchored(&n.node) && !owned.contains(&n.id))
        .map(|n| n.id.clone())
        .collect();

    b = b
        .group(
            CONSTRUCT_ROOT_ID,
            GroupNode {
                children,
                arrangement,
                spacing,
            },
        )?
        .root(CONSTRUCT_ROOT_ID);

    if transitions.is_empty() {
        b = b.add(CONSTRUCT_ROOT_ID);
        for id in anchored {
            b = b.add(id);
        }
    } else {
        let mentioned: BTreeSet<String> = transitions
            .iter()
            .flat_map(|s| s.targets().into_iter().map(str::to_owned))
            .collect();
        let mut statics = Vec::new();
        collect_statics(&b.nodes, CONSTRUCT_ROOT_ID, &mentioned, &mut statics);
        for id in anchored {
            collect_statics(&b.nodes, &id, &mentioned, &mut statics);
        }
        for id in statics {
            b = b.add(id);
        }
        for step in transitions {
            b = b.step(step);
        }
    }
    let scene = b.build()?;
    Timeline::compile(&scene)?;
    Ok(scene)
}

fn is_anchored(node: &Node) -> bool {
    matches!(
        node,
        Node::Arrow(a) if matches!(a.from, AnchorRef::Node { .. })
            || matches!(a.to, AnchorRef::Node { .. })
    )
}

/// Largest subtrees under `id` that no transition touches.
fn collect_statics(
    nodes: &[NodeDef],
    id: &str,
    mentioned: &BTreeSet<String>,
    out: &mut Vec<String>,
) {
    if mentioned.contains(id) {
        return;
    }
    let children = match nodes.iter().find(|n| n.id == id).map(|n| &n.node) {
        Some(Node::Group(g)) => g.children.as_slice(),
        _ => &[],
    };
    if !touches(nodes, id, mentioned, 0) {
        out.push(id.to_owned());
        return;
    }
    for child in children {
        collect_statics(nodes, child, mentioned, out);
    }
}

fn touches(nodes: &[NodeDef], id: &str, mentioned: &BTreeSet<String>, depth: usize) -> bool {
    if mentioned.contains(id) {
        return true;
    }
    if depth > nodes.len() {
        return false;
    }
    match nodes.iter().find(|n| n.id == id).map(|n| &n.node) {
        Some(Node::Group(g)) => g
            .children
            .iter()
            .any(|c| touches(nodes, c, mentioned, depth + 1)),
        _ => false,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/dsl.rs"]
mod tests;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Context as _;

use crate::{
    animation::ease::Ease,
    foundation::color::Color,
    foundation::core::{Canvas, Fps},
    foundation::error::{ScenegridError, ScenegridResult},
    grid::highlight::{CellColoring, Outline},
    grid::model::Grid,
};

/// Pixels per scene unit. Spacing constants below are expressed in units and scaled by this.
pub const UNIT_PX: f64 = 90.0;

/// A complete, declarative diagram scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub name: String,
    #[serde(default)]
    pub canvas: Canvas,
    #[serde(default)]
    pub fps: Fps,
    #[serde(default = "default_background")]
    pub background: Color,
    /// Color of matrix entries, labels and strokes unless a node overrides it.
    #[serde(default)]
    pub foreground: Color,
    /// Nodes in draw order.
    pub nodes: Vec<NodeDef>,
    /// Node centered on the canvas (usually the outermost group).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Nodes visible from the first frame without an entrance.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<TransitionStep>,
    /// Pause inserted between consecutive steps.
    #[serde(default)]
    pub pause_secs: f64,
    /// Hold after the last step.
    #[serde(default = "default_tail_secs")]
    pub tail_secs: f64,
}

fn default_background() -> Color {
    Color::BLACK
}

fn default_tail_secs() -> f64 {
    1.0
}

/// Identified node.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeDef {
    pub id: String,
    pub node: Node,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Matrix(MatrixNode),
    Label(LabelNode),
    Box(BoxNode),
    Arrow(ArrowNode),
    Group(GroupNode),
}

impl Node {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Matrix(_) => "matrix",
            Self::Label(_) => "label",
            Self::Box(_) => "box",
            Self::Arrow(_) => "arrow",
            Self::Group(_) => "group",
        }
    }
}

/// Grid rendered as bracketed rows x columns of entries.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MatrixNode {
    pub grid: Grid,
    #[serde(default)]
    pub coloring: CellColoring,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outlines: Vec<Outline>,
    /// Distance between neighbouring column centers, in pixels.
    #[serde(default = "MatrixNode::default_h_buff")]
    pub h_buff: f64,
    /// Distance between neighbouring row centers, in pixels.
    #[serde(default = "MatrixNode::default_v_buff")]
    pub v_buff: f64,
    #[serde(default = "MatrixNode::default_font_size")]
    pub font_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bracket_color: Option<Color>,
}

impl MatrixNode {
    pub(crate) fn default_h_buff() -> f64 {
        1.3 * UNIT_PX
    }

    pub(crate) fn default_v_buff() -> f64 {
        0.8 * UNIT_PX
    }

    pub(crate) fn default_font_size() -> f64 {
        36.0
    }

    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            coloring: CellColoring::default(),
            outlines: Vec::new(),
            h_buff: Self::default_h_buff(),
            v_buff: Self::default_v_buff(),
            font_size: Self::default_font_size(),
            bracket_color: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LabelNode {
    pub text: String,
    #[serde(default = "LabelNode::default_font_size")]
    pub font_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl LabelNode {
    pub(crate) fn default_font_size() -> f64 {
        28.0
    }

    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: Self::default_font_size(),
            color: None,
        }
    }
}

/// Square frame with centered, vertically stacked lines of text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoxNode {
    pub side: f64,
    pub lines: Vec<LabelNode>,
    /// Vertical gap between lines.
    #[serde(default = "BoxNode::default_line_gap")]
    pub line_gap: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
}

impl BoxNode {
    pub(crate) fn default_line_gap() -> f64 {
        0.3 * UNIT_PX
    }

    pub fn new(side: f64, lines: Vec<LabelNode>) -> Self {
        Self {
            side,
            lines,
            line_gap: Self::default_line_gap(),
            stroke: None,
        }
    }
}

/// Arrow between two anchors. As a group child it is laid out as a horizontal arrow of
/// `length` pixels and the anchors are ignored.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ArrowNode {
    pub from: AnchorRef,
    pub to: AnchorRef,
    #[serde(default = "ArrowNode::default_length")]
    pub length: f64,
    /// Gap left between each endpoint and its anchor.
    #[serde(default = "ArrowNode::default_buff")]
    pub buff: f64,
    #[serde(default = "ArrowNode::default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl ArrowNode {
    pub(crate) fn default_length() -> f64 {
        2.0 * UNIT_PX
    }

    pub(crate) fn default_buff() -> f64 {
        0.25 * UNIT_PX
    }

    pub(crate) fn default_stroke_width() -> f64 {
        4.0
    }

    /// Arrow from `from`'s anchor to `to`'s anchor.
    pub fn between(from: AnchorRef, to: AnchorRef) -> Self {
        Self {
            from,
            to,
            length: Self::default_length(),
            buff: Self::default_buff(),
            stroke_width: Self::default_stroke_width(),
            color: None,
        }
    }

    /// Left-to-right arrow meant to sit between two arranged siblings.
    pub fn horizontal() -> Self {
        Self::between(
            AnchorRef::Point {
                x: -UNIT_PX,
                y: 0.0,
            },
            AnchorRef::Point { x: UNIT_PX, y: 0.0 },
        )
    }
}

/// Endpoint of an arrow.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorRef {
    /// Anchor point of another node's laid-out bounds.
    Node { node: String, anchor: Anchor },
    /// Free point, relative to the canvas center (y down).
    Point { x: f64, y: f64 },
}

impl AnchorRef {
    pub fn node(id: impl Into<String>, anchor: Anchor) -> Self {
        Self::Node {
            node: id.into(),
            anchor,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Center,
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GroupNode {
    pub children: Vec<String>,
    pub arrangement: Arrangement,
    /// Uniform gap between neighbouring children.
    #[serde(default)]
    pub spacing: f64,
}

impl GroupNode {
    pub fn new<I, S>(children: I, arrangement: Arrangement, spacing: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            children: children.into_iter().map(Into::into).collect(),
            arrangement,
            spacing,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arrangement {
    /// Left to right.
    Row,
    /// Top to bottom.
    Column,
    /// Row-major grid with `cols` columns.
    Grid { cols: usize },
}

/// One authored animation event.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionStep {
    Appear {
        node: String,
        #[serde(default = "default_step_secs")]
        duration_secs: f64,
        #[serde(default)]
        ease: Ease,
    },
    Morph {
        from: String,
        to: String,
        #[serde(default = "default_step_secs")]
        duration_secs: f64,
        #[serde(default)]
        ease: Ease,
    },
    Disappear {
        node: String,
        #[serde(default = "default_step_secs")]
        duration_secs: f64,
        #[serde(default)]
        ease: Ease,
    },
    Wait {
        #[serde(default = "default_step_secs")]
        duration_secs: f64,
    },
}

pub(crate) fn default_step_secs() -> f64 {
    1.0
}

impl TransitionStep {
    pub fn appear(node: impl Into<String>) -> Self {
        Self::Appear {
            node: node.into(),
            duration_secs: default_step_secs(),
            ease: Ease::default(),
        }
    }

    pub fn morph(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Morph {
            from: from.into(),
            to: to.into(),
            duration_secs: default_step_secs(),
            ease: Ease::default(),
        }
    }

    pub fn disappear(node: impl Into<String>) -> Self {
        Self::Disappear {
            node: node.into(),
            duration_secs: default_step_secs(),
            ease: Ease::default(),
        }
    }

    pub fn wait(duration_secs: f64) -> Self {
        Self::Wait { duration_secs }
    }

    pub fn duration_secs(&self) -> f64 {
        match self {
            Self::Appear { duration_secs, .. }
            | Self::Morph { duration_secs, .. }
            | Self::Disappear { duration_secs, .. }
            | Self::Wait { duration_secs } => *duration_secs,
        }
    }

    pub fn ease(&self) -> Ease {
        match self {
            Self::Appear { ease, .. } | Self::Morph { ease, .. } | Self::Disappear { ease, .. } => {
                *ease
            }
            Self::Wait { .. } => Ease::Linear,
        }
    }

    /// Node ids this step refers to.
    pub fn targets(&self) -> Vec<&str> {
        match self {
            Self::Appear { node, .. } | Self::Disappear { node, .. } => vec![node.as_str()],
            Self::Morph { from, to, .. } => vec![from.as_str(), to.as_str()],
            Self::Wait { .. } => Vec::new(),
        }
    }
}

impl Scene {
    pub fn from_json_str(s: &str) -> ScenegridResult<Self> {
        let scene: Scene = serde_json::from_str(s)?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ScenegridResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read scene '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn to_json_pretty(&self) -> ScenegridResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id).map(|n| &n.node)
    }

    /// Child -> parent group map.
    pub fn parents(&self) -> BTreeMap<&str, &str> {
        let mut out = BTreeMap::new();
        for def in &self.nodes {
            if let Node::Group(g) = &def.node {
                for child in &g.children {
                    out.insert(child.as_str(), def.id.as_str());
                }
            }
        }
        out
    }

    /// `id` followed by its enclosing groups, innermost first.
    pub fn ancestry<'a>(&'a self, id: &'a str) -> Vec<&'a str> {
        let parents = self.parents();
        let mut chain = vec![id];
        let mut cur = id;
        while let Some(&p) = parents.get(cur) {
            if chain.contains(&p) {
                break;
            }
            chain.push(p);
            cur = p;
        }
        chain
    }

    /// Every node reachable from `id` through group children, `id` included, in draw order.
    pub fn subtree(&self, id: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let mut seen = BTreeSet::new();
        self.collect_subtree(id, &mut out, &mut seen);
        out
    }

    fn collect_subtree<'a>(
        &'a self,
        id: &str,
        out: &mut Vec<&'a str>,
        seen: &mut BTreeSet<&'a str>,
    ) {
        let Some(def) = self.nodes.iter().find(|n| n.id == id) else {
            return;
        };
        if !seen.insert(def.id.as_str()) {
            return;
        }
        out.push(def.id.as_str());
        if let Node::Group(g) = &def.node {
            for child in &g.children {
                self.collect_subtree(child, out, seen);
            }
        }
    }

    /// Non-group nodes under `id` (or `id` itself when it is not a group).
    pub fn leaves(&self, id: &str) -> Vec<&str> {
        self.subtree(id)
            .into_iter()
            .filter(|n| !matches!(self.node(n), Some(Node::Group(_))))
            .collect()
    }

    pub fn validate(&self) -> ScenegridResult<()> {
        if self.name.trim().is_empty() {
            return Err(ScenegridError::validation("scene name must be non-empty"));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(ScenegridError::validation(
                "fps must have num>0 and den>0",
            ));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ScenegridError::validation(
                "canvas width/height must be > 0",
            ));
        }
        check_secs("pause_secs", self.pause_secs)?;
        check_secs("tail_secs", self.tail_secs)?;

        let mut ids = BTreeSet::new();
        for def in &self.nodes {
            if def.id.trim().is_empty() {
                return Err(ScenegridError::validation("node id must be non-empty"));
            }
            if !ids.insert(def.id.as_str()) {
                return Err(ScenegridError::validation(format!(
                    "duplicate node id '{}'",
                    def.id
                )));
            }
        }
        let require = |id: &str, what: &str| -> ScenegridResult<()> {
            if ids.contains(id) {
                Ok(())
            } else {
                Err(ScenegridError::validation(format!(
                    "{what} references unknown node '{id}'"
                )))
            }
        };

        let mut parent_of = BTreeMap::<&str, &str>::new();
        for def in &self.nodes {
            match &def.node {
                Node::Matrix(m) => validate_matrix(&def.id, m)?,
                Node::Label(l) => validate_label(&def.id, l)?,
                Node::Box(b) => {
                    if !(b.side.is_finite() && b.side > 0.0) {
                        return Err(ScenegridError::validation(format!(
                            "box '{}' side must be > 0",
                            def.id
                        )));
                    }
                    if !(b.line_gap.is_finite() && b.line_gap >= 0.0) {
                        return Err(ScenegridError::validation(format!(
                            "box '{}' line_gap must be finite and >= 0",
                            def.id
                        )));
                    }
                    for line in &b.lines {
                        validate_label(&def.id, line)?;
                    }
                }
                Node::Arrow(a) => {
                    for end in [&a.from, &a.to] {
                        if let AnchorRef::Node { node, .. } = end {
                            require(node.as_str(), &format!("arrow '{}'", def.id))?;
                            if node == &def.id {
                                return Err(ScenegridError::validation(format!(
                                    "arrow '{}' cannot anchor to itself",
                                    def.id
                                )));
                            }
                        }
                    }
                    if !(a.length.is_finite() && a.length > 0.0) {
                        return Err(ScenegridError::validation(format!(
                            "arrow '{}' length must be > 0",
                            def.id
                        )));
                    }
                    if !(a.buff.is_finite() && a.buff >= 0.0) {
                        return Err(ScenegridError::validation(format!(
                            "arrow '{}' buff must be finite and >= 0",
                            def.id
                        )));
                    }
                    if !(a.stroke_width.is_finite() && a.stroke_width > 0.0) {
                        return Err(ScenegridError::validation(format!(
                            "arrow '{}' stroke_width must be > 0",
                            def.id
                        )));
                    }
                }
                Node::Group(g) => {
                    if let Arrangement::Grid { cols: 0 } = g.arrangement {
                        return Err(ScenegridError::validation(format!(
                            "group '{}' grid arrangement needs cols >= 1",
                            def.id
                        )));
                    }
                    if !(g.spacing.is_finite() && g.spacing >= 0.0) {
                        return Err(ScenegridError::validation(format!(
                            "group '{}' spacing must be >= 0",
                            def.id
                        )));
                    }
                    for child in &g.children {
                        require(child.as_str(), &format!("group '{}'", def.id))?;
                        if let Some(prev) = parent_of.insert(child.as_str(), def.id.as_str()) {
                            return Err(ScenegridError::validation(format!(
                                "node '{child}' belongs to both '{prev}' and '{}'",
                                def.id
                            )));
                        }
                    }
                }
            }
        }

        // With single parents, a cycle is a parent chain that revisits a node.
        for id in &ids {
            let mut cur = *id;
            let mut steps = 0usize;
            while let Some(&p) = parent_of.get(cur) {
                steps += 1;
                if p == *id || steps > ids.len() {
                    return Err(ScenegridError::validation(format!(
                        "group nesting cycle through '{id}'"
                    )));
                }
                cur = p;
            }
        }

        if let Some(root) = &self.root {
            require(root.as_str(), "scene root")?;
        }
        for id in &self.added {
            require(id.as_str(), "added list")?;
        }
        for step in &self.steps {
            for target in step.targets() {
                require(target, "transition")?;
            }
            check_secs("step duration_secs", step.duration_secs())?;
            if let TransitionStep::Morph { from, to, .. } = step
                && from == to
            {
                return Err(ScenegridError::validation(format!(
                    "morph source and target are both '{from}'"
                )));
            }
        }
        Ok(())
    }
}

fn check_secs(what: &str, v: f64) -> ScenegridResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(ScenegridError::validation(format!(
            "{what} must be finite and >= 0"
        )));
    }
    Ok(())
}

fn validate_matrix(id: &str, m: &MatrixNode) -> ScenegridResult<()> {
    for (what, v) in [
        ("h_buff", m.h_buff),
        ("v_buff", m.v_buff),
        ("font_size", m.font_size),
    ] {
        if !(v.is_finite() && v > 0.0) {
            return Err(ScenegridError::validation(format!(
                "matrix '{id}' {what} must be > 0"
            )));
        }
    }
    m.coloring.validate_for(m.grid.len())?;
    for o in &m.outlines {
        o.selection.flat_indices(&m.grid)?;
    }
    Ok(())
}

fn validate_label(id: &str, l: &LabelNode) -> ScenegridResult<()> {
    if !(l.font_size.is_finite() && l.font_size > 0.0) {
        return Err(ScenegridError::validation(format!(
            "'{id}' font_size must be > 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;

use crate::foundation::{
    color::Color,
    core::{Canvas, Point},
};

/// What a primitive depicts. Morphs pair primitives of the same role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Entry,
    Bracket,
    Outline,
    Label,
    Frame,
    Arrow,
    ArrowTip,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Entry,
        Role::Bracket,
        Role::Outline,
        Role::Label,
        Role::Frame,
        Role::Arrow,
        Role::ArrowTip,
    ];
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Single line of text centered on `center`.
    Text {
        center: Point,
        text: String,
        font_size: f64,
    },
    /// Stroked polyline, closed into a polygon when `closed`.
    Stroke {
        points: Vec<Point>,
        width: f64,
        closed: bool,
    },
    /// Filled polygon.
    Fill { points: Vec<Point> },
}

impl Shape {
    pub(crate) fn kind_tag(&self) -> u8 {
        match self {
            Self::Text { .. } => 0,
            Self::Stroke { .. } => 1,
            Self::Fill { .. } => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    /// Id of the scene node that produced this primitive.
    pub node: String,
    pub role: Role,
    pub shape: Shape,
    pub color: Color,
    /// Multiplies the color's alpha.
    pub opacity: f64,
    /// Drawn fraction of a stroke's length, `1.0` when complete. Ignored by text and fills.
    pub reveal: f64,
}

impl Primitive {
    pub fn new(node: impl Into<String>, role: Role, shape: Shape, color: Color) -> Self {
        Self {
            node: node.into(),
            role,
            shape,
            color,
            opacity: 1.0,
            reveal: 1.0,
        }
    }

    /// Final alpha after color alpha and opacity.
    pub fn alpha(&self) -> f64 {
        (self.color.a * self.opacity).clamp(0.0, 1.0)
    }

    /// `true` when nothing would be drawn.
    pub fn is_invisible(&self) -> bool {
        self.alpha() <= 0.0 || self.reveal <= 0.0
    }
}

/// Ordered, fully resolved drawing of one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayList {
    pub canvas: Canvas,
    pub background: Color,
    pub items: Vec<Primitive>,
}

impl DisplayList {
    pub fn new(canvas: Canvas, background: Color) -> Self {
        Self {
            canvas,
            background,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items produced by node `id`.
    pub fn of_node<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Primitive> + 'a {
        self.items.iter().filter(move |p| p.node == id)
    }
}

/// Total length of a polyline.
pub fn polyline_length(points: &[Point], closed: bool) -> f64 {
    let mut len: f64 = points.windows(2).map(|w| (w[1] - w[0]).hypot()).sum();
    if closed
        && points.len() > 2
        && let (Some(first), Some(last)) = (points.first(), points.last())
    {
        len += (*first - *last).hypot();
    }
    len
}

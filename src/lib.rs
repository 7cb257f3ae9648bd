//! scenegrid builds declarative matrix and diagram scenes and renders them to frames.
//!
//! The API is scene-oriented:
//!
//! - Describe a [`Scene`] with [`SceneBuilder`] or [`construct`], load one from JSON, or pick one
//!   from the built-in [`catalog`]
//! - Create a [`RenderSession`]
//! - Render single frames or stream a range into a [`FrameSink`]
#![forbid(unsafe_code)]

/// Appear, morph and disappear scheduling.
pub mod animation;
/// Built-in diagram scenes.
pub mod catalog;
/// Frame sinks: memory, PNG sequence and `ffmpeg`.
pub mod encode;
pub mod eval;
pub mod foundation;
pub mod grid;
/// Placement of nodes on the canvas.
pub mod layout;
/// Display list to pixels.
pub mod render;
/// Scene model and builder.
pub mod scene;
/// Session-oriented rendering API.
pub mod session;

pub use crate::foundation::color::Color;
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Point, Rect, Vec2};
pub use crate::foundation::error::{ScenegridError, ScenegridResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::timeline::Timeline;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::eval::display::DisplayList;
pub use crate::grid::highlight::{HighlightRange, Selection};
pub use crate::grid::model::{CellValue, Grid};
pub use crate::layout::solver::{Layout, solve_layout};
pub use crate::render::backend::{FrameRGBA, RenderSettings};
pub use crate::scene::dsl::{MatrixBuilder, SceneBuilder, construct};
pub use crate::scene::model::{
    Anchor, AnchorRef, Arrangement, ArrowNode, BoxNode, GroupNode, LabelNode, MatrixNode, Node,
    NodeDef, Scene, TransitionStep, UNIT_PX,
};
pub use crate::session::render_session::{RenderSession, RenderSessionOpts, RenderStats};

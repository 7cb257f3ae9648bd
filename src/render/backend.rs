use std::path::PathBuf;

use crate::{
    eval::display::DisplayList,
    foundation::error::ScenegridResult,
    render::{raster, svg},
};

/// A rendered frame as RGBA8 pixels.
///
/// Frames from [`SvgBackend`] are premultiplied alpha; the flag makes this explicit at API
/// boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA8 at pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let p = self.data.get(i..i + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }
}

/// Turns display lists into pixels.
pub trait RenderBackend: Send + Sync {
    fn render(&self, list: &DisplayList) -> ScenegridResult<FrameRGBA>;
}

/// Backend-agnostic settings.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    /// Load the fonts installed on the system.
    pub system_fonts: bool,
    /// Extra directory scanned for `.ttf`/`.otf`/`.ttc` files.
    pub font_dir: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            system_fonts: true,
            font_dir: None,
        }
    }
}

/// SVG document rendered through `usvg`/`resvg`.
#[derive(Clone, Debug)]
pub struct SvgBackend {
    fonts: raster::FontSet,
}

impl SvgBackend {
    pub fn new(settings: &RenderSettings) -> Self {
        Self {
            fonts: raster::FontSet::new(settings.system_fonts, settings.font_dir.as_deref()),
        }
    }
}

impl RenderBackend for SvgBackend {
    fn render(&self, list: &DisplayList) -> ScenegridResult<FrameRGBA> {
        let doc = svg::to_svg_document(list);
        raster::rasterize(&doc, list.canvas, &self.fonts)
    }
}

/// Create the rendering backend.
pub fn create_backend(settings: &RenderSettings) -> ScenegridResult<Box<dyn RenderBackend>> {
    Ok(Box::new(SvgBackend::new(settings)))
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;

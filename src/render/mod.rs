//! Display list to pixels: SVG serialization and `resvg` rasterization.

/// Frame buffers, settings and the backend seam.
pub mod backend;
/// Font loading and SVG rasterization.
pub mod raster;
/// Display list to SVG document.
pub mod svg;

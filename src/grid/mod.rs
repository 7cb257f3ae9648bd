//! Grids of display values and the rules that color their cells.

/// Highlight ranges, color cycles and row/column outlines.
pub mod highlight;
/// The immutable `Grid` value.
pub mod model;

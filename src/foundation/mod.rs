//! Shared primitives: frame/time types, colors, errors and small math helpers.

/// Color values and the named diagram palette.
pub mod color;
/// Frame/time and canvas types plus `kurbo` geometry re-exports.
pub mod core;
/// Error taxonomy.
pub mod error;
pub(crate) mod math;

//! Frame evaluation: scene + layout + timeline into an ordered display list.

/// Display list primitives.
pub mod display;
/// Per-frame resolution of appear, morph and disappear.
pub mod evaluator;
/// Display-list fingerprints for static-frame elision.
pub mod fingerprint;
/// Static primitives of each node kind.
pub mod primitives;

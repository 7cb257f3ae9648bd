//! Easing curves and the sequential transition timeline.

/// Rate functions.
pub mod ease;
/// Step scheduling and per-frame node visibility.
pub mod timeline;

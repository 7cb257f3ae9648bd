//! Scene description: nodes, arrangements and the authored transition sequence.

/// Fluent builders and the one-call `construct` entry point.
pub mod dsl;
/// Serializable scene model and its structural validation.
pub mod model;

//! Render sessions: solve once, render frames or ranges many times.

/// Session type, options and range rendering.
pub mod render_session;

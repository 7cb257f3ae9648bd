//! Frame sinks: in-memory capture, PNG sequences and `ffmpeg` MP4 encoding.

/// MP4 output through the system `ffmpeg`.
pub mod ffmpeg;
/// The sink contract plus in-memory and PNG implementations.
pub mod sink;

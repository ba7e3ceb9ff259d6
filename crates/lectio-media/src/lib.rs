//! FFmpeg CLI adapter for the enrichment pipeline.
//!
//! This crate provides:
//! - Audio extraction from lecture video (analysis-ready MP3 stream)
//! - Duration probing from FFmpeg's textual output

pub mod audio;
pub mod error;
pub mod probe;

pub use audio::extract_audio;
pub use error::{MediaError, MediaResult};
pub use probe::probe_duration;

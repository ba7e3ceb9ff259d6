//! Gemini API client for the enrichment pipeline.
//!
//! This crate provides:
//! - Resumable upload to the Files API (handshake + finalize transfer)
//! - Readiness polling until an uploaded file becomes ACTIVE
//! - Single-turn content generation referencing an uploaded file
//! - Normalization of fenced model output into usable shapes
//!
//! The API key and base URLs are injected through [`GeminiConfig`];
//! nothing here reads ambient process state, so every surface can be
//! pointed at a local mock server in tests.

pub mod config;
pub mod error;
pub mod files;
pub mod generate;
pub mod normalize;

pub use config::GeminiConfig;
pub use error::{GeminiError, GeminiResult};
pub use files::{FileState, FilesClient, PollBudget, UploadHandle};
pub use generate::{DecodeConfig, GenerationClient};
pub use normalize::{parse_html, parse_topics, strip_code_fence};

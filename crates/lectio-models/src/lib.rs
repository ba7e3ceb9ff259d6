//! Shared data models for the Lectio enrichment pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Enrichment task descriptors (video index, slide summary)
//! - Topics extracted from lecture audio
//! - HTML study summaries
//! - Timestamp parsing for model-returned offsets

pub mod summary;
pub mod task;
pub mod timestamp;
pub mod topic;

// Re-export common types
pub use summary::{PipelineOutput, Summary, SummaryFormat};
pub use task::{FileArea, MediaAsset, TaskDescriptor, TaskKind};
pub use timestamp::{parse_clock, parse_timestamp_value};
pub use topic::{normalize_keywords, RawTopic, Topic};

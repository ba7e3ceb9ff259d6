//! Lecture media enrichment worker.
//!
//! This crate provides:
//! - Task executor dispatching video/slides enrichment runs
//! - The shared upload/poll/generate pipeline both tasks use
//! - Topic post-processing (timestamp parse, duration clamp)
//! - The storage collaborator trait and local/in-memory stores

pub mod config;
pub mod error;
pub mod executor;
pub mod pipeline;
pub mod prompts;
pub mod storage;
pub mod topics;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use executor::TaskExecutor;
pub use storage::{LectureStore, LocalStore, MemoryStore, StorageError, StoredFile};

//! Worker error types.

use thiserror::Error;

use lectio_models::FileArea;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No source file found for instance {instance_id} in area {area:?}")]
    NoSourceFile { instance_id: i64, area: FileArea },

    #[error("Gemini error: {0}")]
    Gemini(#[from] lectio_gemini::GeminiError),

    #[error("Media error: {0}")]
    Media(#[from] lectio_media::MediaError),

    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the failure happened before any provider call.
    ///
    /// Input failures leave the host entity untouched and usually point
    /// at a bad upload or a broken extraction, not at the provider.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            WorkerError::NoSourceFile { .. }
                | WorkerError::Gemini(lectio_gemini::GeminiError::EmptyFile(_))
        )
    }
}

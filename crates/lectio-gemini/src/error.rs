//! Gemini client error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for Gemini operations.
pub type GeminiResult<T> = Result<T, GeminiError>;

/// Errors from the upload, polling and generation surfaces.
///
/// Variants split along the recovery boundary the pipeline cares
/// about: transport failures during polling are the only retryable
/// class, everything else terminates the run.
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY not set")]
    MissingApiKey,

    #[error("Staged file is empty: {0}")]
    EmptyFile(PathBuf),

    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("Upload handshake rejected (HTTP {status}): {body}")]
    HandshakeRejected { status: u16, body: String },

    #[error("Handshake succeeded but no x-goog-upload-url header was returned")]
    MissingSessionUrl,

    #[error("Byte upload rejected (HTTP {status}): {body}")]
    UploadRejected { status: u16, body: String },

    #[error("Unparseable file URI from upload response: {0}")]
    InvalidFileUri(String),

    #[error("File processing failed on the provider side: {0}")]
    FileFailed(String),

    #[error("API error while polling file status: {0}")]
    PollRejected(String),

    #[error("Timed out waiting for file to become ACTIVE after {attempts} attempts")]
    PollTimedOut { attempts: u32 },

    #[error("Generation requested for a file that is not ACTIVE (state: {0})")]
    FileNotReady(String),

    #[error("Generation rejected (HTTP {status}): {body}")]
    GenerationRejected { status: u16, body: String },

    #[error("No candidates in generation response{}", feedback_suffix(.feedback))]
    NoCandidates { feedback: Option<String> },

    #[error("Candidate found but its text was empty")]
    EmptyText,

    #[error("Model output is not the expected JSON shape: {0}")]
    MalformedOutput(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn feedback_suffix(feedback: &Option<String>) -> String {
    match feedback {
        Some(fb) => format!(" (prompt feedback: {fb})"),
        None => String::new(),
    }
}

impl GeminiError {
    /// Whether the error is a transient transport failure.
    ///
    /// Only the readiness poller retries, and only this class.
    pub fn is_transport(&self) -> bool {
        matches!(self, GeminiError::Connection(_))
    }
}

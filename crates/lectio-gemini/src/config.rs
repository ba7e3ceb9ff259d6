//! Gemini client configuration.

use std::time::Duration;

use crate::error::{GeminiError, GeminiResult};

/// Default v1beta API base.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default resumable-upload base.
pub const DEFAULT_UPLOAD_BASE: &str = "https://generativelanguage.googleapis.com/upload/v1beta";
/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Gemini client configuration.
///
/// The API key is always passed in explicitly; components never read
/// it from the environment themselves. Base URLs are overridable so
/// tests can target a local mock server.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Provider API key
    pub api_key: String,
    /// Base URL for status polling and generation
    pub api_base: String,
    /// Base URL for the resumable file upload endpoint
    pub upload_base: String,
    /// Generation model name
    pub model: String,
    /// Upload handshake timeout
    pub handshake_timeout: Duration,
    /// Byte-transfer timeout
    pub upload_timeout: Duration,
    /// Content-generation timeout
    pub generate_timeout: Duration,
}

impl GeminiConfig {
    /// Create a config with default endpoints for the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            upload_base: DEFAULT_UPLOAD_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            handshake_timeout: Duration::from_secs(60),
            upload_timeout: Duration::from_secs(300),
            generate_timeout: Duration::from_secs(120),
        }
    }

    /// Create config from environment variables.
    ///
    /// `GEMINI_API_KEY` is required; a missing key is a configuration
    /// error and no network call is ever attempted without one.
    pub fn from_env() -> GeminiResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(GeminiError::MissingApiKey)?;

        let mut config = Self::new(api_key);
        if let Ok(base) = std::env::var("GEMINI_API_BASE") {
            config.api_base = base;
        }
        if let Ok(base) = std::env::var("GEMINI_UPLOAD_BASE") {
            config.upload_base = base;
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.model = model;
        }
        Ok(config)
    }

    /// Override both base URLs, pointing the client at a test server.
    pub fn with_bases(mut self, api_base: impl Into<String>, upload_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self.upload_base = upload_base.into();
        self
    }
}

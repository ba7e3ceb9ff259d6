//! Single-turn content generation referencing an uploaded file.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GeminiConfig;
use crate::error::{GeminiError, GeminiResult};
use crate::files::{FileState, UploadHandle};

/// Task-specific decoding configuration.
///
/// Serialized as the wire `generationConfig` object.
#[derive(Debug, Clone, Serialize)]
pub struct DecodeConfig {
    pub temperature: f64,
    #[serde(rename = "topP", skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: DecodeConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    File { file_data: FileData },
}

#[derive(Debug, Serialize)]
struct FileData {
    mime_type: String,
    file_uri: String,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Client for `models/{model}:generateContent`.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    http: Client,
    config: GeminiConfig,
}

impl GenerationClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Run one generation request and return the raw candidate text.
    ///
    /// The request parts are `[prompt, file reference]`. HTTP >= 400
    /// is fatal for the call and carries the raw error body for
    /// diagnostics; an empty candidate list is fatal too, surfacing
    /// any `promptFeedback` block (safety filters) the provider sent.
    pub async fn generate(
        &self,
        prompt: &str,
        handle: &UploadHandle,
        decode: &DecodeConfig,
        mime_type: &str,
    ) -> GeminiResult<String> {
        // Referencing a file before it is ACTIVE yields confusing
        // provider errors, so it is rejected here instead.
        if handle.state != FileState::Active {
            return Err(GeminiError::FileNotReady(handle.state.as_str().to_string()));
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.api_base, self.config.model, self.config.api_key
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::File {
                        file_data: FileData {
                            mime_type: mime_type.to_string(),
                            file_uri: handle.uri.clone(),
                        },
                    },
                ],
            }],
            generation_config: decode.clone(),
        };

        debug!(model = %self.config.model, uri = %handle.uri, "Sending generation request");

        let response = self
            .http
            .post(&url)
            .json(&request)
            .timeout(self.config.generate_timeout)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::GenerationRejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GeminiResponse = response.json().await?;

        if parsed.candidates.is_empty() {
            return Err(GeminiError::NoCandidates {
                feedback: parsed.prompt_feedback.map(|fb| fb.to_string()),
            });
        }

        let text = parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.as_str())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GeminiError::EmptyText);
        }

        info!(model = %self.config.model, chars = text.len(), "Generation succeeded");
        Ok(text.to_string())
    }
}

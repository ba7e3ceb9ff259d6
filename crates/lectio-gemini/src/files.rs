//! Resumable upload and readiness polling against the Files API.
//!
//! Upload is the provider's two-phase protocol: a metadata handshake
//! that yields a session URL, then a single finalize-on-completion
//! byte transfer. The uploaded file is not usable until its
//! server-side state transitions to ACTIVE, which the poller waits
//! for under a caller-supplied attempt budget.

use std::time::Duration;

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use lectio_models::MediaAsset;

use crate::config::GeminiConfig;
use crate::error::{GeminiError, GeminiResult};

/// Server-side lifecycle state of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Still processing (PROCESSING/PENDING on the wire)
    Pending,
    /// Ready to reference in a generation request
    Active,
    /// Processing failed on the provider side
    Failed,
    /// Anything the API did not name
    Unknown,
}

impl FileState {
    fn from_wire(state: &str) -> Self {
        match state {
            "ACTIVE" => FileState::Active,
            "FAILED" => FileState::Failed,
            "PROCESSING" | "PENDING" => FileState::Pending,
            _ => FileState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileState::Pending => "PENDING",
            FileState::Active => "ACTIVE",
            FileState::Failed => "FAILED",
            FileState::Unknown => "UNKNOWN",
        }
    }
}

/// Provider-assigned reference to an uploaded file.
///
/// Created by [`FilesClient::upload`]; the state field is mutated only
/// by [`FilesClient::wait_until_active`].
#[derive(Debug, Clone)]
pub struct UploadHandle {
    /// Resource name used for status polling, e.g. `files/abc123`
    pub name: String,
    /// Full file URI referenced in generation requests
    pub uri: String,
    /// Last observed lifecycle state
    pub state: FileState,
}

/// Attempt budget for readiness polling.
///
/// Budgets are supplied per call site: the slides pipeline waits up to
/// five minutes for PDF indexing, the video pipeline two minutes.
#[derive(Debug, Clone, Copy)]
pub struct PollBudget {
    /// Maximum number of status checks
    pub max_attempts: u32,
    /// Delay between checks
    pub interval: Duration,
}

impl PollBudget {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: UploadedFile,
}

#[derive(Debug, Deserialize)]
struct UploadedFile {
    uri: String,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileStatus {
    state: Option<String>,
    error: Option<serde_json::Value>,
}

/// Client for the Files API upload and status endpoints.
#[derive(Debug, Clone)]
pub struct FilesClient {
    http: Client,
    config: GeminiConfig,
}

impl FilesClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Upload a staged media file, returning its provider handle.
    ///
    /// A zero-length file is rejected before any network call; it
    /// almost always means an upstream extraction produced nothing.
    /// Neither phase is retried here, the caller decides whether a
    /// re-run is worth it.
    pub async fn upload(&self, asset: &MediaAsset, display_name: &str) -> GeminiResult<UploadHandle> {
        if asset.size_bytes == 0 {
            return Err(GeminiError::EmptyFile(asset.path.clone()));
        }

        let session_url = self.start_session(asset, display_name).await?;
        debug!(display_name, "Upload handshake succeeded, session URL obtained");

        let handle = self.transfer_bytes(asset, &session_url).await?;
        info!(name = %handle.name, size = asset.size_bytes, "File uploaded");
        Ok(handle)
    }

    /// Phase 1: request a resumable session, returning its upload URL.
    async fn start_session(&self, asset: &MediaAsset, display_name: &str) -> GeminiResult<String> {
        let url = format!("{}/files?key={}", self.config.upload_base, self.config.api_key);

        // Built once so the declared Content-Length always matches the
        // bytes actually sent; a mismatch makes the handshake fail
        // silently on the provider side.
        let metadata =
            serde_json::json!({ "file": { "display_name": display_name } }).to_string();

        let response = self
            .http
            .post(&url)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", asset.size_bytes)
            .header("X-Goog-Upload-Header-Content-Type", &asset.mime_type)
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, metadata.len())
            .body(metadata)
            .timeout(self.config.handshake_timeout)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::HandshakeRejected {
                status: status.as_u16(),
                body,
            });
        }

        // HTTP 200 without the session header is still a dead end.
        response
            .headers()
            .get("x-goog-upload-url")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string())
            .ok_or(GeminiError::MissingSessionUrl)
    }

    /// Phase 2: transfer the full file body and finalize the session.
    async fn transfer_bytes(&self, asset: &MediaAsset, session_url: &str) -> GeminiResult<UploadHandle> {
        let bytes = tokio::fs::read(&asset.path).await?;

        let response = self
            .http
            .post(session_url)
            .header(CONTENT_LENGTH, asset.size_bytes)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .timeout(self.config.upload_timeout)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::UploadRejected {
                status: status.as_u16(),
                body,
            });
        }

        let uploaded: UploadResponse = response.json().await?;
        let name = match uploaded.file.name {
            Some(name) => name,
            None => file_name_from_uri(&uploaded.file.uri)?,
        };

        Ok(UploadHandle {
            name,
            uri: uploaded.file.uri,
            state: FileState::Pending,
        })
    }

    /// Poll the file-status endpoint until the file becomes ACTIVE.
    ///
    /// State machine per attempt:
    /// - ACTIVE: terminal success
    /// - FAILED: terminal error, regardless of remaining budget
    /// - explicit `error` payload: terminal error
    /// - PENDING/UNKNOWN: wait the interval and poll again
    /// - transport error: wait and poll again, still consuming budget
    ///
    /// Exceeding the budget yields [`GeminiError::PollTimedOut`].
    pub async fn wait_until_active(
        &self,
        handle: &mut UploadHandle,
        budget: PollBudget,
    ) -> GeminiResult<()> {
        let url = format!("{}/{}?key={}", self.config.api_base, handle.name, self.config.api_key);

        for attempt in 1..=budget.max_attempts {
            match self.poll_once(&url).await {
                Ok(status) => {
                    if let Some(error) = status.error {
                        return Err(GeminiError::PollRejected(error.to_string()));
                    }

                    let state = status
                        .state
                        .as_deref()
                        .map(FileState::from_wire)
                        .unwrap_or(FileState::Unknown);
                    handle.state = state;
                    debug!(
                        name = %handle.name,
                        attempt,
                        max_attempts = budget.max_attempts,
                        state = state.as_str(),
                        "Polled file status"
                    );

                    match state {
                        FileState::Active => {
                            info!(name = %handle.name, attempt, "File is ACTIVE");
                            return Ok(());
                        }
                        FileState::Failed => {
                            return Err(GeminiError::FileFailed(handle.name.clone()));
                        }
                        FileState::Pending | FileState::Unknown => {}
                    }
                }
                // Transient transport faults burn an attempt but do
                // not abort the wait.
                Err(err) if err.is_transport() => {
                    warn!(name = %handle.name, attempt, error = %err, "Transport error while polling");
                }
                Err(err) => return Err(err),
            }

            if attempt < budget.max_attempts {
                tokio::time::sleep(budget.interval).await;
            }
        }

        Err(GeminiError::PollTimedOut {
            attempts: budget.max_attempts,
        })
    }

    async fn poll_once(&self, url: &str) -> GeminiResult<FileStatus> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Error details may arrive either as an HTTP error status or
        // as an `error` object in a 200 body; both end the wait.
        match serde_json::from_str::<FileStatus>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if status.as_u16() >= 400 => Err(GeminiError::PollRejected(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            ))),
            Err(err) => Err(err.into()),
        }
    }
}

/// Derive the pollable resource name (`files/ID`) from a file URI.
fn file_name_from_uri(uri: &str) -> GeminiResult<String> {
    uri.split_once("/files/")
        .map(|(_, id)| format!("files/{id}"))
        .ok_or_else(|| GeminiError::InvalidFileUri(uri.to_string()))
}

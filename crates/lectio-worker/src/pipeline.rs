//! The shared enrichment path and the two task orchestrators.
//!
//! Both tasks run the same remote sequence: upload the staged file,
//! give the provider a moment to index it, poll until ACTIVE, then
//! issue one generation request. The sequence is parameterized by an
//! [`EnrichmentTask`] so video and slides stay one tested code path
//! that differs only in prompt, decoding and budget.

use std::path::Path;

use tracing::{info, warn};

use lectio_gemini::{DecodeConfig, FilesClient, GenerationClient, PollBudget};
use lectio_media::{extract_audio, probe_duration};
use lectio_models::{FileArea, MediaAsset, PipelineOutput, Summary};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::prompts;
use crate::storage::LectureStore;
use crate::topics::build_topics;

/// Task-specific parameters of the shared enrichment path.
pub struct EnrichmentTask {
    pub display_name: &'static str,
    pub mime_type: &'static str,
    pub prompt: String,
    pub decode: DecodeConfig,
    pub poll: PollBudget,
}

impl EnrichmentTask {
    /// Video topic indexing over extracted audio.
    pub fn video_topics(duration_seconds: u64, poll: PollBudget) -> Self {
        Self {
            display_name: "lecture_audio_extract",
            mime_type: "audio/mp3",
            prompt: prompts::topics_prompt(duration_seconds),
            decode: DecodeConfig {
                temperature: 0.2,
                top_p: Some(0.9),
                max_output_tokens: 8192,
                response_mime_type: Some("application/json".to_string()),
            },
            poll,
        }
    }

    /// HTML study summary over a slide deck PDF.
    pub fn slides_summary(poll: PollBudget) -> Self {
        Self {
            display_name: "lecture_slides_pdf",
            mime_type: "application/pdf",
            prompt: prompts::summary_prompt().to_string(),
            decode: DecodeConfig {
                temperature: 0.3,
                top_p: None,
                max_output_tokens: 8192,
                response_mime_type: None,
            },
            poll,
        }
    }
}

/// Upload, wait for readiness, generate. Returns the raw model text.
///
/// No step is retried here: only the poller tolerates transient
/// transport faults, inside its attempt budget. Every other failure is
/// terminal for the run and surfaces to the caller.
pub async fn run_generation(
    config: &WorkerConfig,
    staged: &Path,
    task: &EnrichmentTask,
) -> WorkerResult<String> {
    let asset = MediaAsset::from_path(staged, task.mime_type)?;

    let files = FilesClient::new(config.gemini.clone());
    let mut handle = files.upload(&asset, task.display_name).await?;

    // Provider-side indexing lags the upload acknowledgement.
    tokio::time::sleep(config.pre_poll_delay).await;

    files.wait_until_active(&mut handle, task.poll).await?;

    let generation = GenerationClient::new(config.gemini.clone());
    let raw_text = generation
        .generate(&task.prompt, &handle, &task.decode, task.mime_type)
        .await?;
    Ok(raw_text)
}

/// Resolve the first file in an instance's file area.
async fn first_source_file(
    store: &dyn LectureStore,
    instance_id: i64,
    area: FileArea,
) -> WorkerResult<crate::storage::StoredFile> {
    let files = store.list_files(instance_id, area).await?;
    files
        .into_iter()
        .next()
        .ok_or(WorkerError::NoSourceFile { instance_id, area })
}

/// Video pipeline: extract audio, index topics, persist, mark ready.
///
/// `staging` is a per-run directory owned by the caller; everything
/// written below it is deleted when the run ends, on every exit path.
pub async fn run_video_pipeline(
    config: &WorkerConfig,
    store: &dyn LectureStore,
    instance_id: i64,
    staging: &Path,
) -> WorkerResult<PipelineOutput> {
    let source = first_source_file(store, instance_id, FileArea::Content).await?;
    info!(instance_id, file = %source.filename, "Starting video topic indexing");

    let input_video = staging.join("input_video.tmp");
    let output_audio = staging.join("output_audio.mp3");
    tokio::fs::copy(&source.path, &input_video).await?;

    // A failed extraction aborts before anything touches the network.
    extract_audio(&input_video, &output_audio).await?;

    let duration_seconds = probe_duration(&input_video).await.unwrap_or_else(|err| {
        warn!(instance_id, error = %err, "Duration probe failed, clamping disabled");
        0
    });
    info!(instance_id, duration_seconds, "Audio extracted");

    let task = EnrichmentTask::video_topics(duration_seconds, config.video_poll);
    let raw_text = run_generation(config, &output_audio, &task).await?;

    let raw_topics = lectio_gemini::parse_topics(&raw_text)?;
    let topics = build_topics(raw_topics, duration_seconds);

    store.replace_topics(instance_id, &topics).await?;
    // Only advance the status once the rows are actually persisted.
    store.mark_ready(instance_id).await?;

    info!(instance_id, count = topics.len(), "Topics saved, instance marked ready");
    Ok(PipelineOutput::Topics(topics))
}

/// Slides pipeline: summarize the deck, persist the HTML summary.
pub async fn run_slides_pipeline(
    config: &WorkerConfig,
    store: &dyn LectureStore,
    instance_id: i64,
    staging: &Path,
) -> WorkerResult<PipelineOutput> {
    let source = first_source_file(store, instance_id, FileArea::Slides).await?;
    info!(instance_id, file = %source.filename, "Starting slide summary generation");

    let input_pdf = staging.join("input_slides.pdf");
    tokio::fs::copy(&source.path, &input_pdf).await?;

    let task = EnrichmentTask::slides_summary(config.slides_poll);
    let raw_text = run_generation(config, &input_pdf, &task).await?;

    let html = lectio_gemini::parse_html(&raw_text)?;
    let summary = Summary::html(html);

    store.save_summary(instance_id, &summary).await?;

    info!(instance_id, chars = summary.html.len(), "Summary saved");
    Ok(PipelineOutput::Summary(summary))
}

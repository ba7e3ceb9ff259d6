//! Worker configuration.

use std::time::Duration;

use lectio_gemini::{GeminiConfig, PollBudget};

use crate::error::{WorkerError, WorkerResult};

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Gemini client configuration (key injected, never ambient)
    pub gemini: GeminiConfig,
    /// Poll budget for video audio uploads (~2 minutes)
    pub video_poll: PollBudget,
    /// Poll budget for slide deck uploads (~5 minutes)
    pub slides_poll: PollBudget,
    /// Delay between a successful upload and the first status poll,
    /// covering provider-side indexing latency
    pub pre_poll_delay: Duration,
    /// Root for per-run staging directories
    pub work_dir: String,
}

impl WorkerConfig {
    pub fn new(gemini: GeminiConfig) -> Self {
        Self {
            gemini,
            video_poll: PollBudget::new(24, Duration::from_secs(5)),
            slides_poll: PollBudget::new(60, Duration::from_secs(5)),
            pre_poll_delay: Duration::from_secs(5),
            work_dir: std::env::temp_dir().to_string_lossy().into_owned(),
        }
    }

    /// Create config from environment variables.
    ///
    /// A missing `GEMINI_API_KEY` is fatal here, before any pipeline
    /// step runs.
    pub fn from_env() -> WorkerResult<Self> {
        let gemini = GeminiConfig::from_env()
            .map_err(|err| WorkerError::config(err.to_string()))?;

        let mut config = Self::new(gemini);
        if let Ok(dir) = std::env::var("WORKER_WORK_DIR") {
            config.work_dir = dir;
        }
        if let Some(attempts) = env_u32("WORKER_VIDEO_POLL_ATTEMPTS") {
            config.video_poll.max_attempts = attempts;
        }
        if let Some(attempts) = env_u32("WORKER_SLIDES_POLL_ATTEMPTS") {
            config.slides_poll.max_attempts = attempts;
        }
        if let Some(secs) = env_u32("WORKER_POLL_INTERVAL_SECS") {
            let interval = Duration::from_secs(secs as u64);
            config.video_poll.interval = interval;
            config.slides_poll.interval = interval;
        }
        if let Some(secs) = env_u32("WORKER_PRE_POLL_DELAY_SECS") {
            config.pre_poll_delay = Duration::from_secs(secs as u64);
        }
        Ok(config)
    }
}

fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name).ok().and_then(|value| value.parse().ok())
}

//! Task executor.

use tracing::{error, info};

use lectio_models::{PipelineOutput, TaskDescriptor, TaskKind};

use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::pipeline::{run_slides_pipeline, run_video_pipeline};
use crate::storage::LectureStore;

/// Runs one enrichment task end to end.
///
/// Execution within a run is strictly sequential; concurrency across
/// runs is the host queue's business. The queue is at-least-once, and
/// both pipelines replace rather than append, so re-delivery of the
/// same task converges.
pub struct TaskExecutor {
    config: WorkerConfig,
}

impl TaskExecutor {
    pub fn new(config: WorkerConfig) -> Self {
        Self { config }
    }

    /// Execute a task against the given storage collaborator.
    ///
    /// Staging space lives in a per-run temp directory that is removed
    /// when this function returns, whether the run succeeded or not.
    /// On failure the host entity keeps its prior state; the error is
    /// logged here and returned for the caller to report.
    pub async fn execute(
        &self,
        task: &TaskDescriptor,
        store: &dyn LectureStore,
    ) -> WorkerResult<PipelineOutput> {
        info!(
            task_id = %task.task_id,
            instance_id = task.instance_id,
            kind = ?task.kind,
            "Task started"
        );

        let staging = tempfile::tempdir_in(&self.config.work_dir)?;

        let result = match task.kind {
            TaskKind::VideoTopics => {
                run_video_pipeline(&self.config, store, task.instance_id, staging.path()).await
            }
            TaskKind::SlidesSummary => {
                run_slides_pipeline(&self.config, store, task.instance_id, staging.path()).await
            }
        };

        match &result {
            Ok(_) => info!(task_id = %task.task_id, instance_id = task.instance_id, "Task finished"),
            Err(err) => error!(
                task_id = %task.task_id,
                instance_id = task.instance_id,
                error = %err,
                "Task failed, instance left unchanged"
            ),
        }

        // `staging` drops here, deleting the staged files regardless of
        // how the pipeline exited.
        result
    }
}

//! Enrichment task descriptors and staged media assets.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which enrichment pipeline a task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Video: extract audio, index chronological topics
    VideoTopics,
    /// Slide deck: generate an HTML study summary
    SlidesSummary,
}

/// File area of the host storage collaborator a pipeline reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileArea {
    /// Uploaded lecture video
    Content,
    /// Uploaded slide deck PDF
    Slides,
}

impl TaskKind {
    /// File area this task resolves its source file from.
    pub fn file_area(&self) -> FileArea {
        match self {
            TaskKind::VideoTopics => FileArea::Content,
            TaskKind::SlidesSummary => FileArea::Slides,
        }
    }
}

/// One enrichment task handed over by the host task queue.
///
/// The queue is at-least-once with no ordering guarantees, so runs for
/// the same instance must converge rather than accumulate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// Unique id of this run, for log correlation
    pub task_id: Uuid,
    /// Host entity this run enriches
    pub instance_id: i64,
    /// Pipeline to run
    pub kind: TaskKind,
    /// When the task was created
    pub created_at: DateTime<Utc>,
}

impl TaskDescriptor {
    pub fn new(instance_id: i64, kind: TaskKind) -> Self {
        Self {
            task_id: Uuid::new_v4(),
            instance_id,
            kind,
            created_at: Utc::now(),
        }
    }
}

/// A locally staged media file bound for upload.
#[derive(Debug, Clone)]
pub struct MediaAsset {
    /// Local path of the staged file
    pub path: PathBuf,
    /// Declared MIME type sent with the upload handshake
    pub mime_type: String,
    /// File size in bytes
    pub size_bytes: u64,
}

impl MediaAsset {
    /// Build an asset from a staged file, reading its size from disk.
    pub fn from_path(path: impl AsRef<Path>, mime_type: impl Into<String>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let size_bytes = std::fs::metadata(&path)?.len();
        Ok(Self {
            path,
            mime_type: mime_type.into(),
            size_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_kind_file_area() {
        assert_eq!(TaskKind::VideoTopics.file_area(), FileArea::Content);
        assert_eq!(TaskKind::SlidesSummary.file_area(), FileArea::Slides);
    }

    #[test]
    fn test_task_descriptor_roundtrip() {
        let task = TaskDescriptor::new(7, TaskKind::SlidesSummary);
        let json = serde_json::to_string(&task).unwrap();
        let back: TaskDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back.instance_id, 7);
        assert_eq!(back.kind, TaskKind::SlidesSummary);
    }
}

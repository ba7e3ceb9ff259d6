//! Storage collaborator boundary.
//!
//! The host application owns persistence; the pipeline only talks to
//! this trait. [`MemoryStore`] backs tests, [`LocalStore`] backs the
//! standalone worker binary.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use lectio_models::{FileArea, Summary, Topic};

pub type StoreResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// A file handle resolved from the host's file storage.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Original filename, for logging
    pub filename: String,
    /// Local path the host materialized the content at
    pub path: PathBuf,
}

/// Persistence collaborator the pipeline hands results to.
#[async_trait]
pub trait LectureStore: Send + Sync {
    /// Ordered file handles for an instance's file area.
    async fn list_files(&self, instance_id: i64, area: FileArea) -> StoreResult<Vec<StoredFile>>;

    /// Replace all topic rows for an instance (delete-then-insert).
    ///
    /// Full replacement keeps re-runs convergent: the second run's rows
    /// win, never a union of both runs.
    async fn replace_topics(&self, instance_id: i64, topics: &[Topic]) -> StoreResult<()>;

    /// Store the study summary for an instance.
    async fn save_summary(&self, instance_id: i64, summary: &Summary) -> StoreResult<()>;

    /// Advance the instance status to "ready".
    async fn mark_ready(&self, instance_id: i64) -> StoreResult<()>;
}

// =============================================================================
// In-memory store (tests)
// =============================================================================

/// In-memory store for tests and dry runs.
///
/// Lock poisoning is recovered rather than propagated: a panic in one
/// test task must not wedge the assertions that inspect the store
/// afterwards.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<(i64, FileArea), Vec<StoredFile>>>,
    topics: Mutex<HashMap<i64, Vec<Topic>>>,
    summaries: Mutex<HashMap<i64, Summary>>,
    ready: Mutex<Vec<i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source file for an instance.
    pub fn add_file(&self, instance_id: i64, area: FileArea, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.files
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry((instance_id, area))
            .or_default()
            .push(StoredFile { filename, path });
    }

    pub fn topics_for(&self, instance_id: i64) -> Option<Vec<Topic>> {
        self.topics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&instance_id)
            .cloned()
    }

    pub fn summary_for(&self, instance_id: i64) -> Option<Summary> {
        self.summaries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&instance_id)
            .cloned()
    }

    pub fn is_ready(&self, instance_id: i64) -> bool {
        self.ready
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(&instance_id)
    }
}

#[async_trait]
impl LectureStore for MemoryStore {
    async fn list_files(&self, instance_id: i64, area: FileArea) -> StoreResult<Vec<StoredFile>> {
        Ok(self
            .files
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&(instance_id, area))
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_topics(&self, instance_id: i64, topics: &[Topic]) -> StoreResult<()> {
        self.topics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(instance_id, topics.to_vec());
        Ok(())
    }

    async fn save_summary(&self, instance_id: i64, summary: &Summary) -> StoreResult<()> {
        self.summaries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(instance_id, summary.clone());
        Ok(())
    }

    async fn mark_ready(&self, instance_id: i64) -> StoreResult<()> {
        let mut ready = self.ready.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !ready.contains(&instance_id) {
            ready.push(instance_id);
        }
        Ok(())
    }
}

// =============================================================================
// Local filesystem store (worker binary)
// =============================================================================

/// Filesystem-backed store for running one pipeline from the CLI.
///
/// Source files are provided directly; results land in an output
/// directory as `topics.json` / `summary.html`, plus a `ready` marker.
#[derive(Debug)]
pub struct LocalStore {
    sources: HashMap<FileArea, Vec<StoredFile>>,
    out_dir: PathBuf,
}

impl LocalStore {
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        Self {
            sources: HashMap::new(),
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }

    pub fn with_source(mut self, area: FileArea, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.sources
            .entry(area)
            .or_default()
            .push(StoredFile { filename, path });
        self
    }
}

#[async_trait]
impl LectureStore for LocalStore {
    async fn list_files(&self, _instance_id: i64, area: FileArea) -> StoreResult<Vec<StoredFile>> {
        Ok(self.sources.get(&area).cloned().unwrap_or_default())
    }

    async fn replace_topics(&self, instance_id: i64, topics: &[Topic]) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.out_dir).await?;
        let path = self.out_dir.join("topics.json");
        let json = serde_json::to_string_pretty(topics)?;
        tokio::fs::write(&path, json).await?;
        info!(instance_id, path = %path.display(), count = topics.len(), "Wrote topics");
        Ok(())
    }

    async fn save_summary(&self, instance_id: i64, summary: &Summary) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.out_dir).await?;
        let path = self.out_dir.join("summary.html");
        tokio::fs::write(&path, &summary.html).await?;
        info!(instance_id, path = %path.display(), "Wrote summary");
        Ok(())
    }

    async fn mark_ready(&self, instance_id: i64) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.out_dir).await?;
        tokio::fs::write(self.out_dir.join("ready"), instance_id.to_string()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectio_models::Topic;

    fn topic(title: &str, start: u64) -> Topic {
        Topic {
            title: title.to_string(),
            start_seconds: start,
            keywords: String::new(),
        }
    }

    #[tokio::test]
    async fn test_replace_topics_is_full_replacement() {
        let store = MemoryStore::new();
        store
            .replace_topics(1, &[topic("Old A", 0), topic("Old B", 60)])
            .await
            .unwrap();
        store.replace_topics(1, &[topic("New", 30)]).await.unwrap();

        let topics = store.topics_for(1).unwrap();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].title, "New");
    }

    #[tokio::test]
    async fn test_store_survives_poisoned_lock() {
        let store = MemoryStore::new();
        store.replace_topics(1, &[topic("Kept", 0)]).await.unwrap();

        // Panic while holding the topics lock, as a crashing task would.
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.topics.lock().unwrap();
            panic!("task crashed mid-write");
        }));
        assert!(result.is_err());

        let topics = store.topics_for(1).unwrap();
        assert_eq!(topics[0].title, "Kept");
        store.replace_topics(1, &[topic("Replaced", 5)]).await.unwrap();
        assert_eq!(store.topics_for(1).unwrap()[0].title, "Replaced");
    }

    #[tokio::test]
    async fn test_list_files_preserves_order() {
        let store = MemoryStore::new();
        store.add_file(1, FileArea::Content, "/tmp/first.mp4");
        store.add_file(1, FileArea::Content, "/tmp/second.mp4");

        let files = store.list_files(1, FileArea::Content).await.unwrap();
        assert_eq!(files[0].filename, "first.mp4");
        assert_eq!(files[1].filename, "second.mp4");
    }
}

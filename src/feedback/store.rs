//! Submission persistence.

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{NewSubmission, Submission};
use crate::error::MarcoError;

/// Backend table for feedback.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persist one validated submission, assigning its id and timestamp.
    async fn submit(&self, new: NewSubmission) -> Result<Submission, MarcoError>;

    /// Every stored submission, newest first.
    async fn list(&self) -> Result<Vec<Submission>, MarcoError>;
}

/// Newest first; among equal timestamps, the later insert first.
fn newest_first(mut submissions: Vec<Submission>) -> Vec<Submission> {
    submissions.reverse();
    submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    submissions
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Submission>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn submit(&self, new: NewSubmission) -> Result<Submission, MarcoError> {
        let submission = Submission::create(new, Utc::now());
        self.rows
            .lock()
            .map_err(|_| MarcoError::Store("store lock poisoned".into()))?
            .push(submission.clone());
        Ok(submission)
    }

    async fn list(&self) -> Result<Vec<Submission>, MarcoError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| MarcoError::Store("store lock poisoned".into()))?
            .clone();
        Ok(newest_first(rows))
    }
}

/// Whole-file JSON array on disk, rewritten on every submit.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<Submission>, MarcoError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(MarcoError::Store(format!("Failed to read {}: {}", self.path.display(), e)));
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| MarcoError::Store(format!("Corrupt store {}: {}", self.path.display(), e)))
    }

    async fn write_all(&self, rows: &[Submission]) -> Result<(), MarcoError> {
        let json = serde_json::to_vec_pretty(rows).map_err(|e| MarcoError::Store(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| MarcoError::Store(format!("Failed to write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| MarcoError::Store(format!("Failed to replace {}: {}", self.path.display(), e)))
    }
}

#[async_trait]
impl SubmissionStore for JsonFileStore {
    async fn submit(&self, new: NewSubmission) -> Result<Submission, MarcoError> {
        let _guard = self.write_lock.lock().await;
        let mut rows = self.read_all().await?;
        let submission = Submission::create(new, Utc::now());
        rows.push(submission.clone());
        self.write_all(&rows).await?;
        Ok(submission)
    }

    async fn list(&self) -> Result<Vec<Submission>, MarcoError> {
        let _guard = self.write_lock.lock().await;
        Ok(newest_first(self.read_all().await?))
    }
}

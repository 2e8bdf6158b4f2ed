use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::result::BatchResult;

/// Lifecycle of a single file inside a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Waiting,
    Processing,
    Completed,
    Failed,
    Skipped,
}

impl FileStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FileStatus::Completed | FileStatus::Failed | FileStatus::Skipped
        )
    }

    /// Whether the drain loop picks this file up.
    pub fn needs_processing(&self) -> bool {
        matches!(self, FileStatus::Waiting | FileStatus::Failed)
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::Waiting => write!(f, "waiting"),
            FileStatus::Processing => write!(f, "processing"),
            FileStatus::Completed => write!(f, "completed"),
            FileStatus::Failed => write!(f, "failed"),
            FileStatus::Skipped => write!(f, "skipped"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFile {
    pub id: String,
    pub path: PathBuf,
    /// Display name (file name component of the path).
    pub name: String,
    /// Size in bytes; 0 when the file could not be inspected.
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub status: FileStatus,
    /// Share of workflow steps finished, 0 to 100.
    pub progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<BatchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl BatchFile {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        let mime_type = detect_mime_type(&path);

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            path,
            name,
            size,
            mime_type,
            status: FileStatus::Waiting,
            progress: 0.0,
            error: None,
            result: None,
            started_at: None,
            completed_at: None,
        }
    }

    /// Extension of the source path, lowercased; empty when there is none.
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default()
    }

    pub(crate) fn mark_processing(&mut self, now: DateTime<Utc>) {
        self.status = FileStatus::Processing;
        self.progress = 0.0;
        self.error = None;
        self.started_at = Some(now);
        self.completed_at = None;
    }

    pub(crate) fn finish(&mut self, status: FileStatus, result: BatchResult, now: DateTime<Utc>) {
        self.status = status;
        if status == FileStatus::Completed {
            self.progress = 100.0;
        }
        self.error = if result.success {
            None
        } else {
            result.errors.last().map(|e| e.message.clone())
        };
        self.result = Some(result);
        self.completed_at = Some(now);
    }
}

/// Detects MIME type from file path using the mime_guess crate.
/// Returns `None` for unknown extensions.
fn detect_mime_type(path: &Path) -> Option<String> {
    mime_guess::from_path(path).first().map(|m| m.to_string())
}

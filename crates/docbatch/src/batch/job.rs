use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflow::ProcessingWorkflow;

use super::file::{BatchFile, FileStatus};
use super::progress::BatchProgress;
use super::result::BatchResult;

/// Lifecycle of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Paused,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Paused => write!(f, "paused"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One batch execution request over a fixed set of files and one workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchJob {
    pub id: String,
    pub name: String,
    pub files: Vec<BatchFile>,
    /// Snapshot taken at creation; later edits to the source workflow do not apply.
    pub workflow: ProcessingWorkflow,
    pub status: JobStatus,
    pub progress: BatchProgress,
    /// Append-only, one entry per finished file execution.
    pub results: Vec<BatchResult>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused_at: Option<DateTime<Utc>>,
}

impl BatchJob {
    pub fn new(name: String, paths: Vec<PathBuf>, workflow: ProcessingWorkflow) -> Self {
        let files: Vec<BatchFile> = paths.into_iter().map(BatchFile::new).collect();
        let progress = BatchProgress::empty(files.len());

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            files,
            workflow,
            status: JobStatus::Pending,
            progress,
            results: Vec::new(),
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            paused_at: None,
        }
    }

    pub fn file(&self, file_id: &str) -> Option<&BatchFile> {
        self.files.iter().find(|f| f.id == file_id)
    }

    pub fn files_with_status(&self, status: FileStatus) -> impl Iterator<Item = &BatchFile> {
        self.files.iter().filter(move |f| f.status == status)
    }

    /// Indices of files the drain loop still has to process.
    pub(crate) fn pending_indices(&self) -> Vec<usize> {
        self.files
            .iter()
            .enumerate()
            .filter(|(_, f)| f.status.needs_processing())
            .map(|(i, _)| i)
            .collect()
    }

    pub(crate) fn record_outcome(
        &mut self,
        index: usize,
        status: FileStatus,
        result: BatchResult,
        now: DateTime<Utc>,
    ) {
        self.results.push(result.clone());
        self.files[index].finish(status, result, now);
    }

    pub(crate) fn recompute_progress(&mut self, now: DateTime<Utc>) -> BatchProgress {
        self.progress = BatchProgress::compute(&self.files, self.started_at, now);
        self.progress.clone()
    }

    /// Wall-clock time between start and completion, when both are known.
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{StepAction, StepType, WorkflowStep};

    fn workflow() -> ProcessingWorkflow {
        ProcessingWorkflow::new("wf").with_step(WorkflowStep::new(
            "analyze",
            StepAction::default_for(StepType::AnalyzeContent),
        ))
    }

    #[test]
    fn test_new_job_is_pending_with_waiting_files() {
        let job = BatchJob::new(
            "job".to_string(),
            vec![PathBuf::from("/a.txt"), PathBuf::from("/b.txt")],
            workflow(),
        );

        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.files.len(), 2);
        assert!(job.files.iter().all(|f| f.status == FileStatus::Waiting));
        assert_eq!(job.progress.total_files, 2);
        assert!(job.started_at.is_none());
        assert_eq!(job.pending_indices(), vec![0, 1]);
    }

    #[test]
    fn test_record_outcome_appends_result_and_updates_file() {
        let mut job = BatchJob::new("job".to_string(), vec![PathBuf::from("/a.txt")], workflow());
        let result = BatchResult {
            file_id: job.files[0].id.clone(),
            file_path: job.files[0].path.clone(),
            step_results: vec![],
            errors: vec![],
            success: true,
            processing_time_ms: 5,
        };

        job.record_outcome(0, FileStatus::Completed, result, Utc::now());
        let progress = job.recompute_progress(Utc::now());

        assert_eq!(job.results.len(), 1);
        assert_eq!(job.files[0].status, FileStatus::Completed);
        assert_eq!(job.files[0].progress, 100.0);
        assert!(job.files[0].result.is_some());
        assert_eq!(progress.successful_files, 1);
        assert!(job.pending_indices().is_empty());
    }

    #[test]
    fn test_job_status_display_and_terminal() {
        assert_eq!(JobStatus::Cancelled.to_string(), "cancelled");
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Paused.is_terminal());
    }
}

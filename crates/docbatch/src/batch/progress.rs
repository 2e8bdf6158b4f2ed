use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::file::{BatchFile, FileStatus};

/// Lower bound for the speed divisor in the ETA estimate (files/minute).
const MIN_SPEED: f64 = 1e-3;

/// Derived completion summary of a job, rebuilt after every file-level
/// state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgress {
    pub total_files: usize,
    pub processed_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    pub skipped_files: usize,
    pub percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_file: Option<String>,
    /// Files per minute since the job started.
    pub processing_speed: f64,
    pub estimated_seconds_remaining: f64,
}

impl BatchProgress {
    pub fn empty(total_files: usize) -> Self {
        Self {
            total_files,
            processed_files: 0,
            successful_files: 0,
            failed_files: 0,
            skipped_files: 0,
            percentage: 0.0,
            current_file: None,
            processing_speed: 0.0,
            estimated_seconds_remaining: 0.0,
        }
    }

    pub fn compute(
        files: &[BatchFile],
        started_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        let total_files = files.len();
        let mut successful_files = 0;
        let mut failed_files = 0;
        let mut skipped_files = 0;
        let mut current_file = None;

        for file in files {
            match file.status {
                FileStatus::Completed => successful_files += 1,
                FileStatus::Failed => failed_files += 1,
                FileStatus::Skipped => skipped_files += 1,
                FileStatus::Processing => {
                    if current_file.is_none() {
                        current_file = Some(file.name.clone());
                    }
                }
                FileStatus::Waiting => {}
            }
        }

        let processed_files = successful_files + failed_files + skipped_files;
        let percentage = if total_files == 0 {
            0.0
        } else {
            (processed_files as f64 / total_files as f64 * 100.0).clamp(0.0, 100.0)
        };

        let elapsed_minutes = started_at
            .map(|start| (now - start).num_milliseconds().max(0) as f64 / 60_000.0)
            .unwrap_or(0.0);
        let processing_speed = if elapsed_minutes > 0.0 {
            processed_files as f64 / elapsed_minutes
        } else {
            0.0
        };

        let remaining = total_files - processed_files;
        let estimated_seconds_remaining = if remaining == 0 {
            0.0
        } else {
            remaining as f64 / processing_speed.max(MIN_SPEED) * 60.0
        };

        Self {
            total_files,
            processed_files,
            successful_files,
            failed_files,
            skipped_files,
            percentage,
            current_file,
            processing_speed,
            estimated_seconds_remaining,
        }
    }

    pub fn remaining_files(&self) -> usize {
        self.total_files - self.processed_files
    }

    pub fn is_finished(&self) -> bool {
        self.processed_files == self.total_files
    }

    /// Whether the counters agree with each other.
    pub fn is_consistent(&self) -> bool {
        self.processed_files == self.successful_files + self.failed_files + self.skipped_files
            && self.processed_files <= self.total_files
            && (0.0..=100.0).contains(&self.percentage)
            && (self.percentage < 100.0 || self.processed_files == self.total_files)
    }
}

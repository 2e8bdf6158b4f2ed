use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::batch::{BatchProgress, JobStatus};

pub type ProgressCallback = Arc<dyn Fn(&BatchProgress) + Send + Sync>;
pub type StatusCallback = Arc<dyn Fn(&str, JobStatus) + Send + Sync>;

/// Per-job subscriber slots; registering replaces the previous callback.
#[derive(Clone, Default)]
pub struct JobCallbacks {
    pub progress: Option<ProgressCallback>,
    pub status: Option<StatusCallback>,
}

impl JobCallbacks {
    pub fn notify_progress(&self, job_id: &str, progress: &BatchProgress) {
        if let Some(callback) = &self.progress {
            isolate(job_id, "progress", || callback(progress));
        }
    }

    pub fn notify_status(&self, job_id: &str, status: JobStatus) {
        if let Some(callback) = &self.status {
            isolate(job_id, "status", || callback(job_id, status));
        }
    }
}

/// Runs a subscriber callback, logging instead of propagating a panic.
fn isolate(job_id: &str, kind: &str, f: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        log::error!("{} callback for job {} panicked", kind, job_id);
    }
}

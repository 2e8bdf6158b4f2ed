pub mod file;
pub mod job;
pub mod progress;
pub mod result;

pub use file::{BatchFile, FileStatus};
pub use job::{BatchJob, JobStatus};
pub use progress::BatchProgress;
pub use result::{BatchResult, ErrorSeverity, ProcessingError, StepResult};

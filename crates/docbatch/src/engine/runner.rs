use std::time::{Duration, Instant};

use tracing::{debug, info_span, warn, Instrument};

use crate::batch::{BatchFile, BatchResult, ErrorSeverity, FileStatus, ProcessingError, StepResult};
use crate::error::StepError;
use crate::processor::{ProcessorRegistry, StepOutput};
use crate::sanitize;
use crate::workflow::{ConditionAction, ErrorHandlingStrategy, ProcessingWorkflow, WorkflowStep};

/// Receives step-level progress of a single file.
pub trait FileProgressReporter: Send + Sync {
    fn step_finished(&self, step: &WorkflowStep, completed_steps: usize, total_steps: usize);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl FileProgressReporter for NoopProgress {
    fn step_finished(&self, _step: &WorkflowStep, _completed_steps: usize, _total_steps: usize) {}
}

/// Terminal state of one file after its workflow ran.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub status: FileStatus,
    pub result: BatchResult,
    /// The job must stop dispatching further files.
    pub stop_job: bool,
}

/// Runs a workflow's enabled steps over one file.
pub struct WorkflowRunner {
    registry: ProcessorRegistry,
    step_timeout: Option<Duration>,
    retry_backoff: Duration,
}

impl WorkflowRunner {
    pub fn new(registry: ProcessorRegistry) -> Self {
        Self {
            registry,
            step_timeout: None,
            retry_backoff: Duration::ZERO,
        }
    }

    pub fn with_step_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.step_timeout = timeout;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn registry(&self) -> &ProcessorRegistry {
        &self.registry
    }

    pub async fn run(
        &self,
        file: &BatchFile,
        workflow: &ProcessingWorkflow,
        progress: &dyn FileProgressReporter,
    ) -> FileOutcome {
        let started = Instant::now();
        let steps = workflow.enabled_steps();
        let total_steps = steps.len();

        let mut step_results = Vec::with_capacity(total_steps);
        let mut errors = Vec::new();
        let mut status = FileStatus::Completed;
        let mut stop_job = false;

        for (index, step) in steps.into_iter().enumerate() {
            let span = info_span!("step",
                step = %step.name,
                step_type = %step.step_type(),
                strategy = ?step.error_handling,
            );
            let (outcome, attempts, duration_ms) = self
                .execute_step(file, step, &mut errors)
                .instrument(span)
                .await;

            let succeeded = outcome.is_ok();
            match outcome {
                Ok(output) => {
                    step_results.push(StepResult::success(step, output, duration_ms, attempts));
                }
                Err(e) => {
                    let message = e.to_string();
                    step_results.push(StepResult::failure(
                        step,
                        message.clone(),
                        duration_ms,
                        attempts,
                    ));

                    match step.error_handling {
                        ErrorHandlingStrategy::StopJob => {
                            warn!(step = %step.name, "Step failed, stopping job: {}", message);
                            errors.push(ProcessingError::new(
                                &step.id,
                                message,
                                ErrorSeverity::Critical,
                            ));
                            status = FileStatus::Failed;
                            stop_job = true;
                        }
                        ErrorHandlingStrategy::SkipFile => {
                            debug!(step = %step.name, "Step failed, skipping file: {}", message);
                            errors.push(ProcessingError::new(
                                &step.id,
                                message,
                                ErrorSeverity::Error,
                            ));
                            status = FileStatus::Skipped;
                        }
                        ErrorHandlingStrategy::Retry | ErrorHandlingStrategy::Continue => {
                            debug!(step = %step.name, "Step failed, continuing: {}", message);
                            errors.push(ProcessingError::new(
                                &step.id,
                                message,
                                ErrorSeverity::Error,
                            ));
                        }
                    }
                }
            }

            progress.step_finished(step, index + 1, total_steps);

            if status != FileStatus::Completed {
                break;
            }

            match workflow.resolve_action(&step.id, succeeded) {
                ConditionAction::Continue => {}
                ConditionAction::Skip => {
                    debug!(step = %step.name, "Condition ended the workflow early");
                    break;
                }
                ConditionAction::Stop => {
                    warn!(step = %step.name, "Condition stopped the job");
                    errors.push(ProcessingError::new(
                        &step.id,
                        format!("Workflow stopped by condition on step '{}'", step.name),
                        ErrorSeverity::Critical,
                    ));
                    status = FileStatus::Failed;
                    stop_job = true;
                    break;
                }
            }
        }

        let result = BatchResult {
            file_id: file.id.clone(),
            file_path: file.path.clone(),
            step_results,
            errors,
            success: status == FileStatus::Completed,
            processing_time_ms: started.elapsed().as_millis() as u64,
        };

        debug!(
            file = %sanitize::redact_path(&file.path),
            status = %status,
            "Workflow finished"
        );

        FileOutcome {
            status,
            result,
            stop_job,
        }
    }

    /// Invokes a step, re-running it once under the retry strategy.
    /// A failed first attempt of a retried step is recorded as a warning.
    async fn execute_step(
        &self,
        file: &BatchFile,
        step: &WorkflowStep,
        errors: &mut Vec<ProcessingError>,
    ) -> (Result<StepOutput, StepError>, u32, u64) {
        let started = Instant::now();
        let mut attempts = 1;
        let mut outcome = self.invoke(file, step).await;

        if step.error_handling == ErrorHandlingStrategy::Retry {
            if let Err(e) = &outcome {
                debug!("Attempt 1 failed, retrying: {}", e);
                errors.push(ProcessingError::new(
                    &step.id,
                    format!("Attempt 1 failed: {}", e),
                    ErrorSeverity::Warning,
                ));
                if !self.retry_backoff.is_zero() {
                    tokio::time::sleep(self.retry_backoff).await;
                }
                attempts = 2;
                outcome = self.invoke(file, step).await;
            }
        }

        (outcome, attempts, started.elapsed().as_millis() as u64)
    }

    async fn invoke(&self, file: &BatchFile, step: &WorkflowStep) -> Result<StepOutput, StepError> {
        let call = self.registry.process(file, &step.action);
        match self.step_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| StepError::Timeout {
                    secs: limit.as_secs(),
                })?,
            None => call.await,
        }
    }
}

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tokio::sync::{Mutex as AsyncMutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{info_span, Instrument};

use crate::batch::{BatchJob, BatchProgress, FileStatus, JobStatus};
use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::processor::ProcessorRegistry;
use crate::sanitize;
use crate::workflow::{ProcessingWorkflow, WorkflowStep};

use super::callbacks::JobCallbacks;
use super::events::{EngineEvent, EventBroadcaster};
use super::runner::{FileOutcome, FileProgressReporter, WorkflowRunner};

/// Why a drain loop stopped dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Halt {
    /// Every queued file was dispatched and finished.
    Drained,
    /// A file asked for the whole job to stop.
    StopJob,
    /// The job left `Running` (paused, cancelled, ...).
    Left(JobStatus),
}

/// Status transitions waiting to be announced, in the order they happened.
#[derive(Default)]
struct StatusQueue {
    pending: VecDeque<JobStatus>,
    /// Set while one caller is delivering the queue.
    delivering: bool,
}

struct JobHandle {
    id: String,
    state: Mutex<BatchJob>,
    callbacks: Mutex<JobCallbacks>,
    statuses: Mutex<StatusQueue>,
    /// Set under the state lock once a file asked for the whole job to stop.
    /// Cleared when the job is executed again.
    stopping: AtomicBool,
    /// Serializes drain loops of this job.
    loop_lock: AsyncMutex<()>,
}

impl JobHandle {
    fn new(job: BatchJob) -> Self {
        Self {
            id: job.id.clone(),
            state: Mutex::new(job),
            callbacks: Mutex::new(JobCallbacks::default()),
            statuses: Mutex::new(StatusQueue::default()),
            stopping: AtomicBool::new(false),
            loop_lock: AsyncMutex::new(()),
        }
    }

    fn state(&self) -> MutexGuard<'_, BatchJob> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Job {} state lock was poisoned, recovering", self.id);
                poisoned.into_inner()
            }
        }
    }

    fn callbacks(&self) -> MutexGuard<'_, JobCallbacks> {
        match self.callbacks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Job {} callback lock was poisoned, recovering", self.id);
                poisoned.into_inner()
            }
        }
    }

    fn statuses(&self) -> MutexGuard<'_, StatusQueue> {
        match self.statuses.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Job {} status queue lock was poisoned, recovering", self.id);
                poisoned.into_inner()
            }
        }
    }

    /// Snapshot of the callbacks so they run without holding the lock.
    fn callback_snapshot(&self) -> JobCallbacks {
        self.callbacks().clone()
    }

    /// Records a transition. Must be called while holding the state lock so
    /// the queue order matches the order of the transitions.
    fn queue_status(&self, status: JobStatus) {
        self.statuses().pending.push_back(status);
    }

    fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::SeqCst)
    }
}

struct EngineInner {
    config: EngineConfig,
    runner: Arc<WorkflowRunner>,
    jobs: RwLock<HashMap<String, Arc<JobHandle>>>,
    job_slots: Option<Arc<Semaphore>>,
    events: EventBroadcaster,
}

/// Creates and runs batch jobs.
///
/// Cloning is cheap and every clone drives the same set of jobs, so a clone
/// can be moved into a spawned task to run `execute_job` in the background.
#[derive(Clone)]
pub struct BatchEngine {
    inner: Arc<EngineInner>,
}

impl BatchEngine {
    /// Engine with the default configuration.
    pub fn new(registry: ProcessorRegistry) -> Self {
        Self::build(registry, EngineConfig::default())
    }

    pub fn with_config(registry: ProcessorRegistry, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(registry, config))
    }

    fn build(registry: ProcessorRegistry, config: EngineConfig) -> Self {
        let runner = WorkflowRunner::new(registry)
            .with_step_timeout(config.step_timeout())
            .with_retry_backoff(config.retry_backoff());
        let job_slots = config
            .max_concurrent_jobs
            .map(|max| Arc::new(Semaphore::new(max)));
        let events = EventBroadcaster::new(config.event_capacity);

        Self {
            inner: Arc::new(EngineInner {
                config,
                runner: Arc::new(runner),
                jobs: RwLock::new(HashMap::new()),
                job_slots,
                events,
            }),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &ProcessorRegistry {
        self.inner.runner.registry()
    }

    /// Stream of every status change and progress snapshot of all jobs.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<EngineEvent> {
        self.inner.events.subscribe()
    }

    /// Stores a new `Pending` job over `paths` with its own copy of `workflow`.
    pub fn create_job(
        &self,
        paths: Vec<PathBuf>,
        workflow: &ProcessingWorkflow,
        name: Option<&str>,
    ) -> Result<String, EngineError> {
        if paths.is_empty() {
            return Err(EngineError::EmptyJob);
        }
        workflow.validate()?;

        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| format!("Batch Job {}", Utc::now().format("%Y-%m-%d %H:%M:%S")));
        let job = BatchJob::new(name, paths, workflow.clone());
        let job_id = job.id.clone();
        let total_files = job.files.len();

        log::info!(
            "Created job {} '{}' with {} files using workflow '{}'",
            job_id,
            job.name,
            total_files,
            workflow.name
        );

        self.inner.events.send(EngineEvent::JobCreated {
            job_id: job_id.clone(),
            name: job.name.clone(),
            total_files,
        });
        self.jobs_write()
            .insert(job_id.clone(), Arc::new(JobHandle::new(job)));

        Ok(job_id)
    }

    /// Runs the job until every queued file is terminal or the job leaves
    /// `Running`.
    ///
    /// `Pending`, `Completed` and `Failed` jobs can be executed; the latter
    /// two re-run their `Waiting` and `Failed` files.
    pub async fn execute_job(&self, job_id: &str) -> Result<(), EngineError> {
        let handle = self.handle(job_id)?;

        let progress = {
            let mut job = handle.state();
            match job.status {
                JobStatus::Running => return Err(EngineError::AlreadyRunning(job_id.to_string())),
                JobStatus::Paused | JobStatus::Cancelled => {
                    return Err(EngineError::InvalidState {
                        job_id: job_id.to_string(),
                        status: job.status,
                    })
                }
                JobStatus::Pending | JobStatus::Completed | JobStatus::Failed => {}
            }

            self.inner.runner.registry().validate(&job.workflow)?;

            let now = Utc::now();
            job.status = JobStatus::Running;
            job.started_at = Some(now);
            job.completed_at = None;
            job.paused_at = None;
            handle.stopping.store(false, Ordering::SeqCst);
            handle.queue_status(JobStatus::Running);
            job.recompute_progress(now)
        };

        log::info!("Job {} started", job_id);
        self.flush_statuses(&handle);
        self.publish_progress(&handle, &progress);

        self.drive(&handle).await
    }

    /// Stops dispatching new files; in-flight files finish. Only valid while
    /// `Running`, and refused once a file has stopped the job.
    pub fn pause_job(&self, job_id: &str) -> bool {
        let Some(handle) = self.find(job_id) else {
            return false;
        };

        {
            let mut job = handle.state();
            if job.status != JobStatus::Running {
                return false;
            }
            if handle.is_stopping() {
                log::debug!("Job {} is stopping, pause refused", job_id);
                return false;
            }
            job.status = JobStatus::Paused;
            job.paused_at = Some(Utc::now());
            handle.queue_status(JobStatus::Paused);
        }

        log::info!("Job {} paused", job_id);
        self.flush_statuses(&handle);
        true
    }

    /// Continues a paused job, draining its remaining `Waiting` and `Failed`
    /// files. Returns `Ok(false)` when the job is unknown or not paused.
    pub async fn resume_job(&self, job_id: &str) -> Result<bool, EngineError> {
        let Some(handle) = self.find(job_id) else {
            return Ok(false);
        };

        {
            let mut job = handle.state();
            if job.status != JobStatus::Paused {
                return Ok(false);
            }
            job.status = JobStatus::Running;
            job.paused_at = None;
            handle.queue_status(JobStatus::Running);
        }

        log::info!("Job {} resumed", job_id);
        self.flush_statuses(&handle);

        self.drive(&handle).await?;
        Ok(true)
    }

    /// Cancels a job unless it already completed or was cancelled.
    /// `Waiting` files stay `Waiting` and are never processed.
    pub fn cancel_job(&self, job_id: &str) -> bool {
        let Some(handle) = self.find(job_id) else {
            return false;
        };

        {
            let mut job = handle.state();
            if matches!(job.status, JobStatus::Completed | JobStatus::Cancelled) {
                return false;
            }
            job.status = JobStatus::Cancelled;
            job.completed_at = Some(Utc::now());
            handle.queue_status(JobStatus::Cancelled);
        }

        log::info!("Job {} cancelled", job_id);
        self.flush_statuses(&handle);
        true
    }

    /// Removes the job and its callbacks, cancelling it first if running.
    pub fn delete_job(&self, job_id: &str) -> bool {
        let Some(handle) = self.find(job_id) else {
            return false;
        };

        let running = handle.state().status == JobStatus::Running;
        if running {
            self.cancel_job(job_id);
        }

        *handle.callbacks() = JobCallbacks::default();
        let removed = self.jobs_write().remove(job_id).is_some();
        if removed {
            log::info!("Job {} deleted", job_id);
            self.inner.events.send(EngineEvent::JobDeleted {
                job_id: job_id.to_string(),
            });
        }
        removed
    }

    pub fn get_job_status(&self, job_id: &str) -> Option<BatchJob> {
        self.find(job_id).map(|handle| handle.state().clone())
    }

    /// All jobs, newest first.
    pub fn get_all_jobs(&self) -> Vec<BatchJob> {
        let handles: Vec<Arc<JobHandle>> = self.jobs_read().values().cloned().collect();
        let mut jobs: Vec<BatchJob> = handles.iter().map(|h| h.state().clone()).collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs
    }

    /// Registers the job's progress callback, replacing any previous one.
    pub fn on_progress<F>(&self, job_id: &str, callback: F) -> Result<(), EngineError>
    where
        F: Fn(&BatchProgress) + Send + Sync + 'static,
    {
        let handle = self.handle(job_id)?;
        handle.callbacks().progress = Some(Arc::new(callback));
        Ok(())
    }

    /// Registers the job's status callback, replacing any previous one.
    pub fn on_status_change<F>(&self, job_id: &str, callback: F) -> Result<(), EngineError>
    where
        F: Fn(&str, JobStatus) + Send + Sync + 'static,
    {
        let handle = self.handle(job_id)?;
        handle.callbacks().status = Some(Arc::new(callback));
        Ok(())
    }

    async fn drive(&self, handle: &Arc<JobHandle>) -> Result<(), EngineError> {
        let span = info_span!("job", job_id = %handle.id);
        async {
            let _loop_guard = handle.loop_lock.lock().await;
            let _permit = match &self.inner.job_slots {
                Some(slots) => Some(Arc::clone(slots).acquire_owned().await.map_err(|_| {
                    EngineError::TaskFailed {
                        job_id: handle.id.clone(),
                        reason: "job slots closed".to_string(),
                    }
                })?),
                None => None,
            };

            let halt = self.drain(handle).await?;
            self.finish(handle, halt);
            Ok::<(), EngineError>(())
        }
        .instrument(span)
        .await
    }

    /// Dispatches queued files with at most `max_concurrent_files` in flight
    /// and applies each outcome as it arrives.
    async fn drain(&self, handle: &Arc<JobHandle>) -> Result<Halt, EngineError> {
        let (mut queue, workflow) = {
            let job = handle.state();
            let queue: VecDeque<usize> = job.pending_indices().into();
            (queue, Arc::new(job.workflow.clone()))
        };
        let max_in_flight = self.inner.config.max_concurrent_files.max(1);
        let mut in_flight: JoinSet<(usize, FileOutcome)> = JoinSet::new();
        let mut halt = Halt::Drained;

        log::debug!("Job {} draining {} files", handle.id, queue.len());

        loop {
            while halt == Halt::Drained && in_flight.len() < max_in_flight {
                let Some(index) = queue.pop_front() else {
                    break;
                };

                let dispatched = {
                    let mut job = handle.state();
                    if job.status != JobStatus::Running {
                        halt = Halt::Left(job.status);
                        None
                    } else {
                        let now = Utc::now();
                        job.files[index].mark_processing(now);
                        let progress = job.recompute_progress(now);
                        Some((job.files[index].clone(), progress))
                    }
                };
                let Some((file, progress)) = dispatched else {
                    break;
                };
                self.publish_progress(handle, &progress);

                let runner = Arc::clone(&self.inner.runner);
                let workflow = Arc::clone(&workflow);
                let reporter = FileReporter {
                    handle: Arc::clone(handle),
                    events: self.inner.events.clone(),
                    index,
                    file_id: file.id.clone(),
                    file_name: file.name.clone(),
                };
                let span = info_span!("file", file = %sanitize::redact_path(&file.path));
                in_flight.spawn(
                    async move {
                        let outcome = runner.run(&file, &workflow, &reporter).await;
                        (index, outcome)
                    }
                    .instrument(span),
                );
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };

            match joined {
                Ok((index, outcome)) => {
                    let stop_job = outcome.stop_job;
                    let progress = {
                        let mut job = handle.state();
                        let now = Utc::now();
                        job.record_outcome(index, outcome.status, outcome.result, now);
                        if stop_job {
                            handle.stopping.store(true, Ordering::SeqCst);
                        }
                        job.recompute_progress(now)
                    };
                    self.publish_progress(handle, &progress);

                    if stop_job && halt == Halt::Drained {
                        log::warn!("Job {} stopping after a failed file", handle.id);
                        halt = Halt::StopJob;
                    }
                }
                Err(e) => {
                    in_flight.abort_all();
                    while in_flight.join_next().await.is_some() {}

                    let reason = if e.is_panic() {
                        "file task panicked".to_string()
                    } else {
                        e.to_string()
                    };
                    self.fail_job(handle, &reason);
                    return Err(EngineError::TaskFailed {
                        job_id: handle.id.clone(),
                        reason,
                    });
                }
            }
        }

        Ok(halt)
    }

    /// Settles the job's status once its drain loop is done.
    ///
    /// A stopped job fails even if it was paused while its in-flight files
    /// drained. Otherwise a job that left `Running` keeps the status it was
    /// given.
    fn finish(&self, handle: &JobHandle, halt: Halt) {
        let settled = {
            let mut job = handle.state();
            let next = match (job.status, halt) {
                (JobStatus::Running | JobStatus::Paused, _) if handle.is_stopping() => {
                    Some(JobStatus::Failed)
                }
                (JobStatus::Running, Halt::Drained) => Some(JobStatus::Completed),
                _ => None,
            };
            next.map(|status| {
                let now = Utc::now();
                job.status = status;
                job.completed_at = Some(now);
                job.paused_at = None;
                handle.queue_status(status);
                (status, job.recompute_progress(now))
            })
        };

        match settled {
            Some((status, progress)) => {
                log::info!(
                    "Job {} {}: {} succeeded, {} failed, {} skipped",
                    handle.id,
                    status,
                    progress.successful_files,
                    progress.failed_files,
                    progress.skipped_files
                );
                self.flush_statuses(handle);
            }
            None => {
                log::debug!("Job {} drain loop ended with {:?}", handle.id, halt);
            }
        }
    }

    fn fail_job(&self, handle: &JobHandle, reason: &str) {
        let progress = {
            let mut job = handle.state();
            let now = Utc::now();
            for file in job.files.iter_mut() {
                if file.status == FileStatus::Processing {
                    file.status = FileStatus::Failed;
                    file.error = Some(reason.to_string());
                    file.completed_at = Some(now);
                }
            }
            job.status = JobStatus::Failed;
            job.completed_at = Some(now);
            handle.queue_status(JobStatus::Failed);
            job.recompute_progress(now)
        };

        log::error!("Job {} failed: {}", handle.id, reason);
        self.publish_progress(handle, &progress);
        self.flush_statuses(handle);
    }

    /// Announces queued transitions on the event stream and to the status
    /// callback, one at a time and in transition order.
    ///
    /// Only one caller delivers at a time. A caller that finds delivery in
    /// progress leaves its transitions to that caller, so a status callback
    /// may itself pause, resume or cancel the job.
    fn flush_statuses(&self, handle: &JobHandle) {
        {
            let mut queue = handle.statuses();
            if queue.delivering {
                return;
            }
            queue.delivering = true;
        }

        loop {
            let status = {
                let mut queue = handle.statuses();
                match queue.pending.pop_front() {
                    Some(status) => status,
                    None => {
                        queue.delivering = false;
                        return;
                    }
                }
            };

            self.inner.events.send(EngineEvent::StatusChanged {
                job_id: handle.id.clone(),
                status,
                timestamp: Utc::now(),
            });
            handle.callback_snapshot().notify_status(&handle.id, status);
        }
    }

    fn publish_progress(&self, handle: &JobHandle, progress: &BatchProgress) {
        self.inner.events.send(EngineEvent::Progress {
            job_id: handle.id.clone(),
            progress: progress.clone(),
        });
        handle.callback_snapshot().notify_progress(&handle.id, progress);
    }

    fn find(&self, job_id: &str) -> Option<Arc<JobHandle>> {
        self.jobs_read().get(job_id).cloned()
    }

    fn handle(&self, job_id: &str) -> Result<Arc<JobHandle>, EngineError> {
        self.find(job_id)
            .ok_or_else(|| EngineError::JobNotFound(job_id.to_string()))
    }

    fn jobs_read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<JobHandle>>> {
        match self.inner.jobs.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Job map lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn jobs_write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<JobHandle>>> {
        match self.inner.jobs.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Job map lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl Default for BatchEngine {
    fn default() -> Self {
        Self::new(ProcessorRegistry::with_builtins())
    }
}

/// Bridges step completions of one in-flight file into the job state and
/// the event stream.
struct FileReporter {
    handle: Arc<JobHandle>,
    events: EventBroadcaster,
    index: usize,
    file_id: String,
    file_name: String,
}

impl FileProgressReporter for FileReporter {
    fn step_finished(&self, step: &WorkflowStep, completed_steps: usize, total_steps: usize) {
        let percentage = if total_steps == 0 {
            100.0
        } else {
            completed_steps as f64 / total_steps as f64 * 100.0
        };

        {
            let mut job = self.handle.state();
            if let Some(file) = job.files.get_mut(self.index) {
                if file.status == FileStatus::Processing {
                    file.progress = percentage;
                }
            }
        }

        self.events.send(EngineEvent::FileProgress {
            job_id: self.handle.id.clone(),
            file_id: self.file_id.clone(),
            file_name: self.file_name.clone(),
            step_name: step.name.clone(),
            percentage,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{StepAction, StepType};

    fn analyze_workflow() -> ProcessingWorkflow {
        ProcessingWorkflow::new("analyze").with_step(WorkflowStep::new(
            "Analyze",
            StepAction::default_for(StepType::AnalyzeContent),
        ))
    }

    #[test]
    fn test_create_job_rejects_empty_file_list() {
        let engine = BatchEngine::default();
        let result = engine.create_job(vec![], &analyze_workflow(), None);
        assert!(matches!(result, Err(EngineError::EmptyJob)));
    }

    #[test]
    fn test_create_job_rejects_empty_workflow() {
        let engine = BatchEngine::default();
        let result = engine.create_job(
            vec![PathBuf::from("/a.txt")],
            &ProcessingWorkflow::new("nothing"),
            None,
        );
        assert!(matches!(result, Err(EngineError::EmptyWorkflow(_))));
    }

    #[test]
    fn test_created_job_is_pending_with_default_name() {
        let engine = BatchEngine::default();
        let id = engine
            .create_job(vec![PathBuf::from("/a.txt")], &analyze_workflow(), None)
            .unwrap();

        let job = engine.get_job_status(&id).unwrap();
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.name.starts_with("Batch Job "));
        assert_eq!(job.progress.total_files, 1);
    }

    #[test]
    fn test_job_keeps_its_own_workflow_copy() {
        let engine = BatchEngine::default();
        let mut workflow = analyze_workflow();
        let id = engine
            .create_job(vec![PathBuf::from("/a.txt")], &workflow, Some("copy"))
            .unwrap();

        workflow.steps.clear();

        let job = engine.get_job_status(&id).unwrap();
        assert_eq!(job.workflow.steps.len(), 1);
    }

    #[test]
    fn test_pause_requires_running() {
        let engine = BatchEngine::default();
        let id = engine
            .create_job(vec![PathBuf::from("/a.txt")], &analyze_workflow(), None)
            .unwrap();

        assert!(!engine.pause_job(&id));
        assert!(!engine.pause_job("missing"));
        assert_eq!(engine.get_job_status(&id).unwrap().status, JobStatus::Pending);
    }

    #[test]
    fn test_cancel_pending_job_then_cancel_again() {
        let engine = BatchEngine::default();
        let id = engine
            .create_job(vec![PathBuf::from("/a.txt")], &analyze_workflow(), None)
            .unwrap();

        assert!(engine.cancel_job(&id));
        assert!(!engine.cancel_job(&id));

        let job = engine.get_job_status(&id).unwrap();
        assert_eq!(job.status, JobStatus::Cancelled);
        assert!(job.completed_at.is_some());
        assert_eq!(job.files[0].status, FileStatus::Waiting);
    }

    #[test]
    fn test_delete_job() {
        let engine = BatchEngine::default();
        let id = engine
            .create_job(vec![PathBuf::from("/a.txt")], &analyze_workflow(), None)
            .unwrap();

        assert!(engine.delete_job(&id));
        assert!(engine.get_job_status(&id).is_none());
        assert!(!engine.delete_job(&id));
    }

    #[test]
    fn test_callbacks_require_known_job() {
        let engine = BatchEngine::default();
        let result = engine.on_progress("missing", |_| {});
        assert!(matches!(result, Err(EngineError::JobNotFound(_))));
    }

    #[test]
    fn test_with_config_validates() {
        let config = EngineConfig::default().with_max_concurrent_files(0);
        assert!(BatchEngine::with_config(ProcessorRegistry::new(), config).is_err());
    }

    #[test]
    fn test_with_config_rejects_oversized_limits() {
        let config = EngineConfig::default().with_max_concurrent_jobs(usize::MAX);
        assert!(BatchEngine::with_config(ProcessorRegistry::new(), config).is_err());

        let config = EngineConfig::default().with_event_capacity(usize::MAX);
        assert!(BatchEngine::with_config(ProcessorRegistry::new(), config).is_err());
    }

    #[tokio::test]
    async fn test_execute_unknown_job() {
        let engine = BatchEngine::default();
        let result = engine.execute_job("missing").await;
        assert!(matches!(result, Err(EngineError::JobNotFound(_))));
    }

    #[tokio::test]
    async fn test_execute_rejects_unregistered_step_type_before_running() {
        let engine = BatchEngine::new(ProcessorRegistry::new());
        let id = engine
            .create_job(vec![PathBuf::from("/a.txt")], &analyze_workflow(), None)
            .unwrap();

        let result = engine.execute_job(&id).await;

        assert!(matches!(
            result,
            Err(EngineError::UnsupportedStepType(StepType::AnalyzeContent))
        ));
        assert_eq!(engine.get_job_status(&id).unwrap().status, JobStatus::Pending);
    }
}

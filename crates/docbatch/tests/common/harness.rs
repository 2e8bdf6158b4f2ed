//! Test harness for isolated engine runs.
//!
//! The `TestHarness` struct owns a temporary input directory and builds
//! engines over a chosen set of processors.

#![allow(dead_code)]

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use docbatch::processor::ProcessorRegistry;
use docbatch::{BatchEngine, BatchJob, EngineConfig, FileStatus, JobStatus};

use super::processors::ScriptedProcessor;

/// Test harness providing an isolated directory for input documents.
pub struct TestHarness {
    temp_dir: TempDir,
    /// Path to the input directory within temp_dir.
    pub input_dir: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let input_dir = temp_dir.path().join("input");
        std::fs::create_dir_all(&input_dir).expect("Failed to create input dir");

        Self {
            temp_dir,
            input_dir,
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a text input file to the input directory.
    pub fn write_text_input(&self, filename: &str, content: &str) -> PathBuf {
        let path = self.input_dir.join(filename);
        std::fs::write(&path, content).expect("Failed to write input file");
        path
    }

    /// Write `count` text files named `f0.txt`, `f1.txt`, ...
    pub fn text_files(&self, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                self.write_text_input(
                    &format!("f{}.txt", i),
                    &format!("Document number {} about invoices and payments", i),
                )
            })
            .collect()
    }

    /// Write an arbitrary file (e.g. a config) into the temp directory.
    pub fn write_file(&self, filename: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(filename);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Engine with the built-in processors.
    pub fn builtin_engine(&self, config: EngineConfig) -> BatchEngine {
        BatchEngine::with_config(ProcessorRegistry::with_builtins(), config)
            .expect("Invalid engine config")
    }

    /// Engine over scripted processors, which the test keeps to inspect.
    pub fn scripted_engine(&self, processors: &[&Arc<ScriptedProcessor>], config: EngineConfig) -> BatchEngine {
        let mut registry = ProcessorRegistry::new();
        for processor in processors {
            let processor: Arc<ScriptedProcessor> = Arc::clone(processor);
            registry.register(processor);
        }
        BatchEngine::with_config(registry, config).expect("Invalid engine config")
    }
}

/// Polls `condition` until it holds or two seconds passed.
pub async fn wait_until<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "Timed out waiting for condition"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Waits until the job has a file in `Processing`.
pub async fn wait_for_processing(engine: &BatchEngine, job_id: &str) {
    wait_until(|| {
        engine
            .get_job_status(job_id)
            .map(|job| job.files.iter().any(|f| f.status == FileStatus::Processing))
            .unwrap_or(false)
    })
    .await;
}

/// Runs a future with a generous upper bound so a stuck drain loop fails
/// the test instead of hanging it.
pub async fn bounded<T>(future: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(10), future)
        .await
        .expect("Operation did not finish in time")
}

pub fn count_files(job: &BatchJob, status: FileStatus) -> usize {
    job.files.iter().filter(|f| f.status == status).count()
}

pub fn assert_status(engine: &BatchEngine, job_id: &str, expected: JobStatus) -> BatchJob {
    let job = engine.get_job_status(job_id).expect("Job not found");
    assert_eq!(job.status, expected, "unexpected status for job {}", job_id);
    job
}

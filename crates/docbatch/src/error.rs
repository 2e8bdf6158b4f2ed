use std::path::PathBuf;
use thiserror::Error;

use crate::batch::JobStatus;
use crate::workflow::StepType;

#[derive(Error, Debug)]
pub enum DocbatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Step error: {0}")]
    Step(#[from] StepError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

/// Failure of a single step invocation on a single file.
#[derive(Error, Debug)]
pub enum StepError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read document '{path}': {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid step parameters: {0}")]
    InvalidParameters(String),

    #[error("Step timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("No processor registered for step type '{0}'")]
    UnsupportedStepType(StepType),

    #[error("{0}")]
    Failed(String),
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Cannot create a job without files")]
    EmptyJob,

    #[error("Workflow '{0}' has no enabled steps")]
    EmptyWorkflow(String),

    #[error("No processor registered for step type '{0}'")]
    UnsupportedStepType(StepType),

    #[error("Job {0} is already running")]
    AlreadyRunning(String),

    #[error("Job {job_id} cannot be executed while {status}")]
    InvalidState { job_id: String, status: JobStatus },

    #[error("File task failed for job {job_id}: {reason}")]
    TaskFailed { job_id: String, reason: String },
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template '{0}' is built-in and cannot be modified")]
    BuiltIn(String),

    #[error("Invalid template: {0}")]
    Invalid(String),

    #[error("Unsupported template export version: {0}")]
    UnsupportedVersion(String),

    #[error("Failed to serialize template: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DocbatchError>;

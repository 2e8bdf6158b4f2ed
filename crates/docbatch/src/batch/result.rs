use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::processor::StepOutput;
use crate::workflow::{StepType, WorkflowStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Warning,
    Error,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingError {
    pub step_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub severity: ErrorSeverity,
}

impl ProcessingError {
    pub fn new(step_id: &str, message: impl Into<String>, severity: ErrorSeverity) -> Self {
        Self {
            step_id: step_id.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            severity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub step_id: String,
    pub step_name: String,
    pub step_type: StepType,
    pub success: bool,
    pub duration_ms: u64,
    /// Number of invocations, 2 when a retry happened.
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<StepOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepResult {
    pub fn success(step: &WorkflowStep, output: StepOutput, duration_ms: u64, attempts: u32) -> Self {
        Self {
            step_id: step.id.clone(),
            step_name: step.name.clone(),
            step_type: step.step_type(),
            success: true,
            duration_ms,
            attempts,
            output: Some(output),
            error: None,
        }
    }

    pub fn failure(step: &WorkflowStep, error: String, duration_ms: u64, attempts: u32) -> Self {
        Self {
            step_id: step.id.clone(),
            step_name: step.name.clone(),
            step_type: step.step_type(),
            success: false,
            duration_ms,
            attempts,
            output: None,
            error: Some(error),
        }
    }
}

/// Outcome of running a workflow over one file. Written once when the
/// file reaches a terminal status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub file_id: String,
    pub file_path: PathBuf,
    pub step_results: Vec<StepResult>,
    pub errors: Vec<ProcessingError>,
    pub success: bool,
    pub processing_time_ms: u64,
}

impl BatchResult {
    /// Output of the last successful step of the given type.
    pub fn output_of(&self, step_type: StepType) -> Option<&StepOutput> {
        self.step_results
            .iter()
            .rev()
            .filter(|r| r.step_type == step_type && r.success)
            .find_map(|r| r.output.as_ref())
    }

    pub fn failed_steps(&self) -> usize {
        self.step_results.iter().filter(|r| !r.success).count()
    }
}

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod processor;
pub mod sanitize;
pub mod telemetry;
pub mod template;
pub mod workflow;

pub use batch::{
    BatchFile, BatchJob, BatchProgress, BatchResult, ErrorSeverity, FileStatus, JobStatus,
    ProcessingError, StepResult,
};
pub use config::{load_engine_config, EngineConfig};
pub use engine::{BatchEngine, EngineEvent};
pub use error::{ConfigError, DocbatchError, EngineError, Result, StepError, TemplateError};
pub use processor::{ProcessorRegistry, StepOutput, StepProcessor};
pub use template::{TemplateManager, WorkflowTemplate};
pub use workflow::{
    ConditionAction, ConditionPredicate, ErrorHandlingStrategy, ProcessingWorkflow, StepAction,
    StepType, WorkflowCondition, WorkflowStep,
};

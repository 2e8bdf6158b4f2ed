pub mod analyze;
pub mod output;
pub mod rename;
pub mod text;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::batch::BatchFile;
use crate::error::{EngineError, StepError};
use crate::workflow::{ProcessingWorkflow, StepAction, StepType};

pub use analyze::ContentAnalyzer;
pub use output::StepOutput;
pub use rename::SmartRenamer;
pub use text::TextExtractor;

/// One unit of work for one step type.
///
/// Implementations get a read-only view of the file and must not keep
/// per-invocation state; the engine may call them for several files at once.
#[async_trait]
pub trait StepProcessor: Send + Sync {
    fn step_type(&self) -> StepType;

    async fn process(&self, file: &BatchFile, action: &StepAction) -> Result<StepOutput, StepError>;
}

/// Maps step types to their processors.
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    processors: HashMap<StepType, Arc<dyn StepProcessor>>,
}

impl ProcessorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the processors that need no external engine:
    /// content analysis, text extraction and smart rename.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ContentAnalyzer::new()));
        registry.register(Arc::new(TextExtractor::new()));
        registry.register(Arc::new(SmartRenamer::new()));
        registry
    }

    /// Registers a processor under its own step type, replacing any previous one.
    pub fn register(&mut self, processor: Arc<dyn StepProcessor>) {
        let step_type = processor.step_type();
        if self.processors.insert(step_type, processor).is_some() {
            log::debug!("Replaced processor for step type {}", step_type);
        }
    }

    pub fn get(&self, step_type: StepType) -> Option<Arc<dyn StepProcessor>> {
        self.processors.get(&step_type).cloned()
    }

    pub fn supports(&self, step_type: StepType) -> bool {
        self.processors.contains_key(&step_type)
    }

    pub fn step_types(&self) -> Vec<StepType> {
        StepType::ALL
            .into_iter()
            .filter(|t| self.supports(*t))
            .collect()
    }

    /// Checks that every enabled step of the workflow has a processor.
    pub fn validate(&self, workflow: &ProcessingWorkflow) -> Result<(), EngineError> {
        match workflow
            .required_step_types()
            .into_iter()
            .find(|t| !self.supports(*t))
        {
            Some(missing) => Err(EngineError::UnsupportedStepType(missing)),
            None => Ok(()),
        }
    }

    pub async fn process(&self, file: &BatchFile, action: &StepAction) -> Result<StepOutput, StepError> {
        let step_type = action.step_type();
        let processor = self
            .get(step_type)
            .ok_or(StepError::UnsupportedStepType(step_type))?;
        processor.process(file, action).await
    }
}

impl std::fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("step_types", &self.step_types())
            .finish()
    }
}

pub mod condition;
pub mod step;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub use condition::{ConditionAction, ConditionPredicate, WorkflowCondition};
pub use step::{
    AnalyzeContentParams, CategorizeParams, CustomScriptParams, DetectDuplicatesParams,
    ErrorHandlingStrategy, ExtractTextParams, OcrParams, OrganizeFoldersParams,
    SmartRenameParams, StepAction, StepType, WorkflowStep,
};

/// An ordered, configurable pipeline of steps applied to every file of a job.
///
/// Jobs keep their own copy, so editing a workflow after a job was created
/// never reaches that job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingWorkflow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
    #[serde(default)]
    pub conditions: Vec<WorkflowCondition>,
    #[serde(default)]
    pub is_template: bool,
}

impl ProcessingWorkflow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: String::new(),
            steps: Vec::new(),
            conditions: Vec::new(),
            is_template: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_step(mut self, step: WorkflowStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_condition(mut self, condition: WorkflowCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn as_template(mut self) -> Self {
        self.is_template = true;
        self
    }

    /// Enabled steps in execution order. The sort is stable, so steps sharing
    /// an order index run in insertion order.
    pub fn enabled_steps(&self) -> Vec<&WorkflowStep> {
        let mut steps: Vec<&WorkflowStep> = self.steps.iter().filter(|s| s.enabled).collect();
        steps.sort_by_key(|s| s.order);
        steps
    }

    /// Distinct step types of the enabled steps, in execution order.
    pub fn required_step_types(&self) -> Vec<StepType> {
        let mut types = Vec::new();
        for step in self.enabled_steps() {
            let step_type = step.step_type();
            if !types.contains(&step_type) {
                types.push(step_type);
            }
        }
        types
    }

    pub fn step(&self, step_id: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    /// Action to apply after `step_id` finished with the given outcome.
    pub fn resolve_action(&self, step_id: &str, succeeded: bool) -> ConditionAction {
        condition::evaluate(&self.conditions, step_id, succeeded)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.enabled_steps().is_empty() {
            return Err(EngineError::EmptyWorkflow(self.name.clone()));
        }
        Ok(())
    }

    /// Deep copy with a new workflow id and new step ids. Conditions are
    /// rewritten to point at the new step ids; conditions referencing
    /// unknown steps are dropped.
    pub fn fresh_copy(&self) -> Self {
        let mut id_map = HashMap::new();
        let steps = self
            .steps
            .iter()
            .map(|step| {
                let new_id = uuid::Uuid::new_v4().to_string();
                id_map.insert(step.id.clone(), new_id.clone());
                WorkflowStep {
                    id: new_id,
                    ..step.clone()
                }
            })
            .collect();

        let conditions = self
            .conditions
            .iter()
            .filter_map(|c| {
                id_map.get(&c.step_id).map(|new_id| WorkflowCondition {
                    step_id: new_id.clone(),
                    ..c.clone()
                })
            })
            .collect();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: self.name.clone(),
            description: self.description.clone(),
            steps,
            conditions,
            is_template: self.is_template,
        }
    }
}

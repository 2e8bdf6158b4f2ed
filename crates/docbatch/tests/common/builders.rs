//! Builder patterns for creating test workflows.

#![allow(dead_code)]

use docbatch::{
    ConditionAction, ConditionPredicate, ErrorHandlingStrategy, ProcessingWorkflow, StepAction,
    StepType, WorkflowCondition, WorkflowStep,
};

/// Builder for `ProcessingWorkflow` instances used across engine tests.
pub struct WorkflowBuilder {
    workflow: ProcessingWorkflow,
}

impl WorkflowBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            workflow: ProcessingWorkflow::new(name),
        }
    }

    /// Append an enabled step with default parameters, ordered after the
    /// existing steps.
    pub fn step(mut self, step_type: StepType, strategy: ErrorHandlingStrategy) -> Self {
        let order = self.workflow.steps.len() as u32;
        self.workflow.steps.push(
            WorkflowStep::new(step_type.as_str(), StepAction::default_for(step_type))
                .with_order(order)
                .with_error_handling(strategy),
        );
        self
    }

    /// Attach a condition to the most recently added step.
    pub fn on_last_step(mut self, predicate: ConditionPredicate, action: ConditionAction) -> Self {
        let step_id = self
            .workflow
            .steps
            .last()
            .expect("Add a step before its condition")
            .id
            .clone();
        self.workflow
            .conditions
            .push(WorkflowCondition::new(step_id, predicate, action));
        self
    }

    pub fn build(self) -> ProcessingWorkflow {
        self.workflow
    }
}

/// Single-step workflow running `step_type` with the given strategy.
pub fn single_step(step_type: StepType, strategy: ErrorHandlingStrategy) -> ProcessingWorkflow {
    WorkflowBuilder::new("single")
        .step(step_type, strategy)
        .build()
}

use serde::{Deserialize, Serialize};

/// Which step outcome a condition reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionPredicate {
    OnSuccess,
    OnFailure,
}

impl ConditionPredicate {
    pub fn matches(&self, succeeded: bool) -> bool {
        match self {
            ConditionPredicate::OnSuccess => succeeded,
            ConditionPredicate::OnFailure => !succeeded,
        }
    }
}

/// What happens to the file's remaining steps when a condition fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionAction {
    Continue,
    /// End this file's steps; the file still completes.
    Skip,
    /// End this file's steps as failed and stop dispatching the job.
    Stop,
}

/// Branch rule bound to a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowCondition {
    pub step_id: String,
    pub predicate: ConditionPredicate,
    pub action: ConditionAction,
}

impl WorkflowCondition {
    pub fn new(
        step_id: impl Into<String>,
        predicate: ConditionPredicate,
        action: ConditionAction,
    ) -> Self {
        Self {
            step_id: step_id.into(),
            predicate,
            action,
        }
    }

    pub fn applies_to(&self, step_id: &str, succeeded: bool) -> bool {
        self.step_id == step_id && self.predicate.matches(succeeded)
    }
}

/// Resolves the action for a finished step: the first matching
/// non-`continue` condition in declaration order wins.
pub fn evaluate(conditions: &[WorkflowCondition], step_id: &str, succeeded: bool) -> ConditionAction {
    conditions
        .iter()
        .filter(|c| c.applies_to(step_id, succeeded))
        .map(|c| c.action)
        .find(|a| *a != ConditionAction::Continue)
        .unwrap_or(ConditionAction::Continue)
}

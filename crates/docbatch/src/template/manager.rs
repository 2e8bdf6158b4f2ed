use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::batch::{BatchJob, JobStatus};
use crate::error::TemplateError;
use crate::workflow::ProcessingWorkflow;

use super::builtin::builtin_templates;
use super::model::{
    NewTemplate, TemplateCategory, TemplateExport, TemplateUpdate, TemplateUsage,
    WorkflowTemplate, EXPORT_VERSION,
};

/// In-memory registry of workflow templates.
///
/// Built-in templates can be used, cloned and exported but never edited or
/// deleted.
pub struct TemplateManager {
    templates: RwLock<HashMap<String, WorkflowTemplate>>,
}

impl TemplateManager {
    /// Manager preloaded with the built-in templates.
    pub fn new() -> Self {
        let manager = Self::empty();
        {
            let mut templates = manager.write();
            for template in builtin_templates() {
                templates.insert(template.id.clone(), template);
            }
        }
        manager
    }

    pub fn empty() -> Self {
        Self {
            templates: RwLock::new(HashMap::new()),
        }
    }

    /// Built-ins first, then by name.
    pub fn list(&self) -> Vec<WorkflowTemplate> {
        let mut templates: Vec<WorkflowTemplate> = self.read().values().cloned().collect();
        templates.sort_by(|a, b| b.built_in.cmp(&a.built_in).then_with(|| a.name.cmp(&b.name)));
        templates
    }

    pub fn get(&self, id: &str) -> Option<WorkflowTemplate> {
        self.read().get(id).cloned()
    }

    pub fn by_category(&self, category: TemplateCategory) -> Vec<WorkflowTemplate> {
        self.list()
            .into_iter()
            .filter(|t| t.category == category)
            .collect()
    }

    /// Case-insensitive match on name, description and tags.
    pub fn search(&self, query: &str) -> Vec<WorkflowTemplate> {
        let query = query.trim();
        if query.is_empty() {
            return self.list();
        }
        self.list()
            .into_iter()
            .filter(|t| t.matches_query(query))
            .collect()
    }

    pub fn create(&self, input: NewTemplate) -> Result<WorkflowTemplate, TemplateError> {
        validate(&input.name, &input.workflow)?;

        let now = Utc::now();
        let template = WorkflowTemplate {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name,
            description: input.description,
            category: input.category,
            tags: input.tags,
            workflow: input.workflow.fresh_copy().as_template(),
            built_in: false,
            created_at: now,
            updated_at: now,
            usage: TemplateUsage::default(),
        };

        log::info!("Created template {} '{}'", template.id, template.name);
        self.write().insert(template.id.clone(), template.clone());
        Ok(template)
    }

    pub fn update(&self, id: &str, update: TemplateUpdate) -> Result<WorkflowTemplate, TemplateError> {
        let mut templates = self.write();
        let template = templates
            .get_mut(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;
        if template.built_in {
            return Err(TemplateError::BuiltIn(id.to_string()));
        }

        let name = update.name.unwrap_or_else(|| template.name.clone());
        let workflow = match update.workflow {
            Some(workflow) => workflow.fresh_copy().as_template(),
            None => template.workflow.clone(),
        };
        validate(&name, &workflow)?;

        template.name = name;
        template.workflow = workflow;
        if let Some(description) = update.description {
            template.description = description;
        }
        if let Some(category) = update.category {
            template.category = category;
        }
        if let Some(tags) = update.tags {
            template.tags = tags;
        }
        template.updated_at = Utc::now();

        log::debug!("Updated template {}", id);
        Ok(template.clone())
    }

    /// Removes a user template. Built-in and unknown ids return `false`.
    pub fn delete(&self, id: &str) -> bool {
        let mut templates = self.write();
        match templates.get(id) {
            Some(template) if !template.built_in => {
                templates.remove(id);
                log::info!("Deleted template {}", id);
                true
            }
            Some(_) => {
                log::warn!("Refusing to delete built-in template {}", id);
                false
            }
            None => false,
        }
    }

    /// Copies a template, built-in or not, into a new user template with
    /// fresh step ids and reset statistics.
    pub fn clone_template(&self, id: &str, name: Option<&str>) -> Result<WorkflowTemplate, TemplateError> {
        let source = self
            .get(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;

        let now = Utc::now();
        let template = WorkflowTemplate {
            id: uuid::Uuid::new_v4().to_string(),
            name: name
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} (Copy)", source.name)),
            workflow: source.workflow.fresh_copy().as_template(),
            built_in: false,
            created_at: now,
            updated_at: now,
            usage: TemplateUsage::default(),
            ..source
        };

        log::info!("Cloned template {} into {}", id, template.id);
        self.write().insert(template.id.clone(), template.clone());
        Ok(template)
    }

    pub fn export(&self, id: &str) -> Result<String, TemplateError> {
        let template = self
            .get(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;
        let export = TemplateExport {
            template,
            exported_at: Utc::now(),
            version: EXPORT_VERSION.to_string(),
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// Imports an exported snapshot as a new user template.
    pub fn import(&self, json: &str) -> Result<WorkflowTemplate, TemplateError> {
        let export: TemplateExport = serde_json::from_str(json)?;
        if export.version != EXPORT_VERSION {
            return Err(TemplateError::UnsupportedVersion(export.version));
        }

        let source = export.template;
        validate(&source.name, &source.workflow)?;

        let now = Utc::now();
        let template = WorkflowTemplate {
            id: uuid::Uuid::new_v4().to_string(),
            workflow: source.workflow.fresh_copy().as_template(),
            built_in: false,
            created_at: now,
            updated_at: now,
            usage: TemplateUsage::default(),
            ..source
        };

        log::info!("Imported template {} '{}'", template.id, template.name);
        self.write().insert(template.id.clone(), template.clone());
        Ok(template)
    }

    pub fn record_usage(&self, id: &str, success: bool, processing_ms: u64) -> Result<(), TemplateError> {
        let mut templates = self.write();
        let template = templates
            .get_mut(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;
        template.usage.record(success, processing_ms, Utc::now());
        Ok(())
    }

    /// Feeds a finished job into the template's statistics. The use counts
    /// as successful when the job completed without failed files.
    pub fn record_job_outcome(&self, id: &str, job: &BatchJob) -> Result<(), TemplateError> {
        if !job.status.is_terminal() {
            return Err(TemplateError::Invalid(format!(
                "job {} has not finished (status {})",
                job.id, job.status
            )));
        }

        let success = job.status == JobStatus::Completed && job.progress.failed_files == 0;
        let processing_ms = job
            .duration()
            .map(|d| d.num_milliseconds().max(0) as u64)
            .unwrap_or_else(|| job.results.iter().map(|r| r.processing_time_ms).sum());

        self.record_usage(id, success, processing_ms)
    }

    /// Templates ranked by `uses × success rate`, highest first.
    pub fn recommendations(&self, limit: usize) -> Vec<WorkflowTemplate> {
        let mut templates = self.list();
        templates.sort_by(|a, b| {
            b.usage
                .score()
                .total_cmp(&a.usage.score())
                .then_with(|| b.usage.total_uses.cmp(&a.usage.total_uses))
                .then_with(|| a.name.cmp(&b.name))
        });
        templates.truncate(limit);
        templates
    }

    /// A runnable copy of the template's workflow with fresh ids.
    pub fn workflow_for(&self, id: &str) -> Result<ProcessingWorkflow, TemplateError> {
        let template = self
            .get(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;
        let mut workflow = template.workflow.fresh_copy();
        workflow.is_template = false;
        Ok(workflow)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, WorkflowTemplate>> {
        match self.templates.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Template lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, WorkflowTemplate>> {
        match self.templates.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Template lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl Default for TemplateManager {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(name: &str, workflow: &ProcessingWorkflow) -> Result<(), TemplateError> {
    if name.trim().is_empty() {
        return Err(TemplateError::Invalid("template name is empty".to_string()));
    }
    workflow
        .validate()
        .map_err(|e| TemplateError::Invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::builtin::{DOCUMENT_ANALYSIS_ID, OCR_RENAME_ID};
    use crate::workflow::{StepAction, StepType, WorkflowStep};

    fn user_workflow() -> ProcessingWorkflow {
        ProcessingWorkflow::new("mine").with_step(WorkflowStep::new(
            "Rename",
            StepAction::default_for(StepType::SmartRename),
        ))
    }

    #[test]
    fn test_new_manager_has_builtins_first() {
        let manager = TemplateManager::new();
        manager
            .create(NewTemplate::new("AAA first by name", user_workflow()))
            .unwrap();

        let list = manager.list();
        assert_eq!(list.len(), 5);
        assert!(list[..4].iter().all(|t| t.built_in));
        assert!(!list[4].built_in);
    }

    #[test]
    fn test_builtin_cannot_be_updated_or_deleted() {
        let manager = TemplateManager::new();

        let result = manager.update(
            DOCUMENT_ANALYSIS_ID,
            TemplateUpdate {
                name: Some("changed".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(TemplateError::BuiltIn(_))));
        assert!(!manager.delete(DOCUMENT_ANALYSIS_ID));
        assert_eq!(
            manager.get(DOCUMENT_ANALYSIS_ID).unwrap().name,
            "Document Analysis"
        );
    }

    #[test]
    fn test_create_rejects_empty_name_and_workflow() {
        let manager = TemplateManager::empty();

        let result = manager.create(NewTemplate::new("  ", user_workflow()));
        assert!(matches!(result, Err(TemplateError::Invalid(_))));

        let result = manager.create(NewTemplate::new("x", ProcessingWorkflow::new("none")));
        assert!(matches!(result, Err(TemplateError::Invalid(_))));
    }

    #[test]
    fn test_update_user_template() {
        let manager = TemplateManager::empty();
        let created = manager
            .create(NewTemplate::new("mine", user_workflow()))
            .unwrap();

        let updated = manager
            .update(
                &created.id,
                TemplateUpdate {
                    description: Some("renames files".to_string()),
                    tags: Some(vec!["rename".to_string()]),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "mine");
        assert_eq!(updated.description, "renames files");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn test_clone_remaps_condition_step_ids() {
        let manager = TemplateManager::new();
        let original = manager.get(OCR_RENAME_ID).unwrap();

        let clone = manager.clone_template(OCR_RENAME_ID, None).unwrap();

        assert_eq!(clone.name, "OCR & Smart Rename (Copy)");
        assert!(!clone.built_in);
        assert_ne!(clone.workflow.steps[0].id, original.workflow.steps[0].id);
        assert_eq!(clone.workflow.conditions[0].step_id, clone.workflow.steps[0].id);
        assert_eq!(clone.usage, TemplateUsage::default());
    }

    #[test]
    fn test_search_and_category() {
        let manager = TemplateManager::new();

        let hits = manager.search("SCAN");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, OCR_RENAME_ID);

        assert_eq!(manager.by_category(TemplateCategory::Cleanup).len(), 1);
        assert_eq!(manager.search("").len(), 4);
    }

    #[test]
    fn test_recommendations_rank_by_score() {
        let manager = TemplateManager::new();
        for _ in 0..3 {
            manager.record_usage(OCR_RENAME_ID, true, 10).unwrap();
        }
        for _ in 0..4 {
            manager.record_usage(DOCUMENT_ANALYSIS_ID, false, 10).unwrap();
        }
        manager.record_usage(DOCUMENT_ANALYSIS_ID, true, 10).unwrap();

        let ranked = manager.recommendations(2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].id, OCR_RENAME_ID);
        assert_eq!(ranked[1].id, DOCUMENT_ANALYSIS_ID);
    }

    #[test]
    fn test_workflow_for_returns_fresh_runnable_copy() {
        let manager = TemplateManager::new();
        let template = manager.get(DOCUMENT_ANALYSIS_ID).unwrap();

        let workflow = manager.workflow_for(DOCUMENT_ANALYSIS_ID).unwrap();

        assert!(!workflow.is_template);
        assert_ne!(workflow.id, template.workflow.id);
        assert_eq!(workflow.steps.len(), template.workflow.steps.len());
        assert!(matches!(
            manager.workflow_for("missing"),
            Err(TemplateError::NotFound(_))
        ));
    }
}

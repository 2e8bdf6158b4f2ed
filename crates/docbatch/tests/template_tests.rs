//! Integration tests for the template library and its use in engine runs.

mod common;

use common::harness::bounded;
use common::*;

use docbatch::template::builtin::{DOCUMENT_ANALYSIS_ID, OCR_RENAME_ID};
use docbatch::template::{NewTemplate, TemplateCategory, TemplateUpdate};
use docbatch::{
    EngineConfig, ErrorHandlingStrategy, JobStatus, StepType, TemplateError, TemplateManager,
};

#[test]
fn test_cloned_builtin_can_be_deleted_but_builtin_cannot() {
    let manager = TemplateManager::new();

    let copy = manager.clone_template(OCR_RENAME_ID, None).unwrap();
    assert!(!copy.built_in);
    assert!(copy.name.ends_with("(Copy)"));

    assert!(!manager.delete(OCR_RENAME_ID));
    assert!(manager.get(OCR_RENAME_ID).is_some());

    assert!(manager.delete(&copy.id));
    assert!(manager.get(&copy.id).is_none());
}

#[test]
fn test_clone_keeps_conditions_bound_to_new_step_ids() {
    let manager = TemplateManager::new();
    let source = manager.get(OCR_RENAME_ID).unwrap();
    let copy = manager.clone_template(OCR_RENAME_ID, Some("My OCR")).unwrap();

    assert_eq!(copy.name, "My OCR");
    assert_ne!(copy.workflow.steps[0].id, source.workflow.steps[0].id);
    for condition in &copy.workflow.conditions {
        assert!(copy.workflow.step(&condition.step_id).is_some());
    }
}

#[test]
fn test_export_import_roundtrip_creates_new_template() {
    let manager = TemplateManager::new();
    let exported = manager.export(DOCUMENT_ANALYSIS_ID).unwrap();

    let imported = manager.import(&exported).unwrap();
    let original = manager.get(DOCUMENT_ANALYSIS_ID).unwrap();

    assert_ne!(imported.id, original.id);
    assert!(!imported.built_in);
    assert_eq!(imported.name, original.name);
    assert_eq!(imported.workflow.steps.len(), original.workflow.steps.len());
    assert_eq!(imported.usage.total_uses, 0);
}

#[test]
fn test_import_rejects_unknown_version_and_bad_json() {
    let manager = TemplateManager::new();
    let exported = manager.export(DOCUMENT_ANALYSIS_ID).unwrap();

    let mut value: serde_json::Value = serde_json::from_str(&exported).unwrap();
    value["version"] = serde_json::json!("9.9");
    let result = manager.import(&value.to_string());
    assert!(matches!(result, Err(TemplateError::UnsupportedVersion(v)) if v == "9.9"));

    let result = manager.import("{ not json");
    assert!(matches!(result, Err(TemplateError::Serialization(_))));
}

#[test]
fn test_user_template_lifecycle() {
    let manager = TemplateManager::new();
    let workflow = WorkflowBuilder::new("invoices")
        .step(StepType::ExtractText, ErrorHandlingStrategy::SkipFile)
        .step(StepType::Categorize, ErrorHandlingStrategy::Continue)
        .build();

    let created = manager
        .create(
            NewTemplate::new("Invoice Sorting", workflow)
                .with_category(TemplateCategory::Organization)
                .with_tags(["invoices"]),
        )
        .unwrap();
    assert!(created.workflow.is_template);
    assert_eq!(manager.search("INVOICE").len(), 1);

    let updated = manager
        .update(
            &created.id,
            TemplateUpdate {
                description: Some("Sorts incoming invoices".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.description, "Sorts incoming invoices");
    assert!(updated.updated_at >= created.updated_at);

    let result = manager.update(DOCUMENT_ANALYSIS_ID, TemplateUpdate::default());
    assert!(matches!(result, Err(TemplateError::BuiltIn(_))));
}

#[tokio::test]
async fn test_template_workflow_runs_and_records_usage() {
    let harness = TestHarness::new();
    let engine = harness.builtin_engine(EngineConfig::default());
    let manager = TemplateManager::new();

    let workflow = manager.workflow_for(DOCUMENT_ANALYSIS_ID).unwrap();
    assert!(!workflow.is_template);

    let id = engine
        .create_job(harness.text_files(3), &workflow, Some("from template"))
        .unwrap();

    let running = engine.get_job_status(&id).unwrap();
    assert!(matches!(
        manager.record_job_outcome(DOCUMENT_ANALYSIS_ID, &running),
        Err(TemplateError::Invalid(_))
    ));

    bounded(engine.execute_job(&id)).await.unwrap();
    let job = engine.get_job_status(&id).unwrap();
    assert_eq!(job.status, JobStatus::Completed);

    manager.record_job_outcome(DOCUMENT_ANALYSIS_ID, &job).unwrap();

    let template = manager.get(DOCUMENT_ANALYSIS_ID).unwrap();
    assert_eq!(template.usage.total_uses, 1);
    assert_eq!(template.usage.success_rate, 1.0);
    assert!(template.usage.last_used.is_some());

    let top = manager.recommendations(1);
    assert_eq!(top[0].id, DOCUMENT_ANALYSIS_ID);
}

use chrono::Utc;

use crate::workflow::{
    ConditionAction, ConditionPredicate, ErrorHandlingStrategy, ProcessingWorkflow,
    SmartRenameParams, StepAction, StepType, WorkflowCondition, WorkflowStep,
};

use super::model::{TemplateCategory, TemplateUsage, WorkflowTemplate};

pub const DOCUMENT_ANALYSIS_ID: &str = "builtin-document-analysis";
pub const OCR_RENAME_ID: &str = "builtin-ocr-rename";
pub const SMART_ORGANIZE_ID: &str = "builtin-smart-organize";
pub const DUPLICATE_CLEANUP_ID: &str = "builtin-duplicate-cleanup";

fn step(name: &str, step_type: StepType, order: u32, strategy: ErrorHandlingStrategy) -> WorkflowStep {
    WorkflowStep::new(name, StepAction::default_for(step_type))
        .with_order(order)
        .with_error_handling(strategy)
}

fn built_in(
    id: &str,
    name: &str,
    description: &str,
    category: TemplateCategory,
    tags: &[&str],
    workflow: ProcessingWorkflow,
) -> WorkflowTemplate {
    let now = Utc::now();
    WorkflowTemplate {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        workflow: workflow.as_template(),
        built_in: true,
        created_at: now,
        updated_at: now,
        usage: TemplateUsage::default(),
    }
}

fn document_analysis() -> WorkflowTemplate {
    let workflow = ProcessingWorkflow::new("Document Analysis")
        .with_description("Extract text and summarize document content")
        .with_step(step(
            "Extract text",
            StepType::ExtractText,
            0,
            ErrorHandlingStrategy::SkipFile,
        ))
        .with_step(step(
            "Analyze content",
            StepType::AnalyzeContent,
            1,
            ErrorHandlingStrategy::Continue,
        ));

    built_in(
        DOCUMENT_ANALYSIS_ID,
        "Document Analysis",
        "Extracts text and computes word statistics and keywords",
        TemplateCategory::Analysis,
        &["text", "keywords", "analysis"],
        workflow,
    )
}

fn ocr_rename() -> WorkflowTemplate {
    let ocr = step(
        "Recognize text",
        StepType::OcrRecognition,
        0,
        ErrorHandlingStrategy::Retry,
    );
    let ocr_id = ocr.id.clone();
    let rename = WorkflowStep::new(
        "Rename by date",
        StepAction::SmartRename(SmartRenameParams {
            pattern: "$y-$m-$d_$original".to_string(),
            lowercase: false,
        }),
    )
    .with_order(1)
    .with_error_handling(ErrorHandlingStrategy::SkipFile);

    let workflow = ProcessingWorkflow::new("OCR & Smart Rename")
        .with_description("Recognize scanned text, then rename with a date prefix")
        .with_step(ocr)
        .with_step(rename)
        .with_condition(WorkflowCondition::new(
            ocr_id,
            ConditionPredicate::OnFailure,
            ConditionAction::Skip,
        ));

    built_in(
        OCR_RENAME_ID,
        "OCR & Smart Rename",
        "Runs OCR on scans and gives them date-prefixed names",
        TemplateCategory::Ocr,
        &["ocr", "scan", "rename"],
        workflow,
    )
}

fn smart_organize() -> WorkflowTemplate {
    let workflow = ProcessingWorkflow::new("Smart Organize")
        .with_description("Categorize documents and sort them into folders")
        .with_step(step(
            "Analyze content",
            StepType::AnalyzeContent,
            0,
            ErrorHandlingStrategy::Continue,
        ))
        .with_step(step(
            "Categorize",
            StepType::Categorize,
            1,
            ErrorHandlingStrategy::SkipFile,
        ))
        .with_step(step(
            "Organize folders",
            StepType::OrganizeFolders,
            2,
            ErrorHandlingStrategy::StopJob,
        ));

    built_in(
        SMART_ORGANIZE_ID,
        "Smart Organize",
        "Categorizes documents and moves them into a folder structure",
        TemplateCategory::Organization,
        &["categorize", "folders", "organize"],
        workflow,
    )
}

fn duplicate_cleanup() -> WorkflowTemplate {
    let workflow = ProcessingWorkflow::new("Duplicate Cleanup")
        .with_description("Find duplicate documents")
        .with_step(step(
            "Extract text",
            StepType::ExtractText,
            0,
            ErrorHandlingStrategy::Continue,
        ))
        .with_step(step(
            "Detect duplicates",
            StepType::DetectDuplicates,
            1,
            ErrorHandlingStrategy::SkipFile,
        ));

    built_in(
        DUPLICATE_CLEANUP_ID,
        "Duplicate Cleanup",
        "Flags documents whose content matches another document",
        TemplateCategory::Cleanup,
        &["duplicates", "cleanup"],
        workflow,
    )
}

/// The immutable templates every manager starts with.
pub fn builtin_templates() -> Vec<WorkflowTemplate> {
    vec![
        document_analysis(),
        ocr_rename(),
        smart_organize(),
        duplicate_cleanup(),
    ]
}

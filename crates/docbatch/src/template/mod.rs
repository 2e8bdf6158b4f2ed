pub mod builtin;
pub mod manager;
pub mod model;

pub use builtin::builtin_templates;
pub use manager::TemplateManager;
pub use model::{
    NewTemplate, TemplateCategory, TemplateExport, TemplateUpdate, TemplateUsage,
    WorkflowTemplate, EXPORT_VERSION,
};

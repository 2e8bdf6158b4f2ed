use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflow::ProcessingWorkflow;

/// Current version of the template export format.
pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateCategory {
    Analysis,
    Ocr,
    Organization,
    Cleanup,
    Custom,
}

impl std::fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateCategory::Analysis => write!(f, "analysis"),
            TemplateCategory::Ocr => write!(f, "ocr"),
            TemplateCategory::Organization => write!(f, "organization"),
            TemplateCategory::Cleanup => write!(f, "cleanup"),
            TemplateCategory::Custom => write!(f, "custom"),
        }
    }
}

/// Running usage statistics of a template.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateUsage {
    pub total_uses: u64,
    /// Share of successful uses, 0.0 to 1.0.
    pub success_rate: f64,
    pub average_processing_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
}

impl TemplateUsage {
    pub fn record(&mut self, success: bool, processing_ms: u64, at: DateTime<Utc>) {
        let previous_successes = (self.success_rate * self.total_uses as f64).round();
        self.total_uses += 1;
        let n = self.total_uses as f64;

        self.success_rate = (previous_successes + if success { 1.0 } else { 0.0 }) / n;
        self.average_processing_ms =
            (self.average_processing_ms * (n - 1.0) + processing_ms as f64) / n;
        self.last_used = Some(at);
    }

    /// Ranking score for recommendations.
    pub fn score(&self) -> f64 {
        self.total_uses as f64 * self.success_rate
    }
}

/// A named, reusable workflow preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: TemplateCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    pub workflow: ProcessingWorkflow,
    #[serde(default)]
    pub built_in: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub usage: TemplateUsage,
}

impl WorkflowTemplate {
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&query))
    }
}

/// Input for a user-created template.
#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    pub tags: Vec<String>,
    pub workflow: ProcessingWorkflow,
}

impl NewTemplate {
    pub fn new(name: impl Into<String>, workflow: ProcessingWorkflow) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: TemplateCategory::Custom,
            tags: Vec::new(),
            workflow,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: TemplateCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Partial update of a user template; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TemplateUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<TemplateCategory>,
    pub tags: Option<Vec<String>>,
    pub workflow: Option<ProcessingWorkflow>,
}

/// Versioned snapshot used for template export and import.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateExport {
    pub template: WorkflowTemplate,
    pub exported_at: DateTime<Utc>,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_success_rate_and_average() {
        let mut usage = TemplateUsage::default();
        let now = Utc::now();

        usage.record(true, 100, now);
        usage.record(false, 300, now);
        usage.record(true, 200, now);

        assert_eq!(usage.total_uses, 3);
        assert!((usage.success_rate - 2.0 / 3.0).abs() < 1e-9);
        assert!((usage.average_processing_ms - 200.0).abs() < 1e-9);
        assert_eq!(usage.last_used, Some(now));
        assert!((usage.score() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_use() {
        let mut usage = TemplateUsage::default();
        usage.record(false, 50, Utc::now());

        assert_eq!(usage.total_uses, 1);
        assert_eq!(usage.success_rate, 0.0);
        assert_eq!(usage.average_processing_ms, 50.0);
        assert_eq!(usage.score(), 0.0);
    }

    #[test]
    fn test_export_field_names() {
        let template = WorkflowTemplate {
            id: "t".to_string(),
            name: "T".to_string(),
            description: String::new(),
            category: TemplateCategory::Custom,
            tags: vec![],
            workflow: ProcessingWorkflow::new("wf"),
            built_in: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            usage: TemplateUsage::default(),
        };
        let export = TemplateExport {
            template,
            exported_at: Utc::now(),
            version: EXPORT_VERSION.to_string(),
        };

        let json = serde_json::to_value(&export).unwrap();
        assert!(json.get("exportedAt").is_some());
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["template"]["builtIn"], false);
    }
}

use serde::{Deserialize, Serialize};

/// Typed result of one successful step invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum StepOutput {
    ContentAnalysis {
        word_count: usize,
        line_count: usize,
        char_count: usize,
        keywords: Vec<String>,
    },
    Text {
        text: String,
        truncated: bool,
    },
    Ocr {
        text: String,
        confidence: f32,
    },
    Rename {
        new_name: String,
    },
    Category {
        category: String,
        confidence: f32,
    },
    Organized {
        destination: String,
    },
    Duplicates {
        duplicate_of: Vec<String>,
    },
    /// Free-form output of processors registered by the embedding application.
    Custom(serde_json::Value),
}

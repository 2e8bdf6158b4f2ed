use std::path::Path;

use async_trait::async_trait;

use crate::batch::BatchFile;
use crate::error::StepError;
use crate::processor::{StepOutput, StepProcessor};
use crate::workflow::{ExtractTextParams, StepAction, StepType};

const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md", "markdown", "csv", "log"];

pub fn is_text_document(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| TEXT_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reads the content of a plain-text document.
pub async fn read_text(path: &Path) -> Result<String, StepError> {
    if !is_text_document(path) {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();
        return Err(StepError::UnsupportedFormat(extension));
    }

    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StepError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates on a character boundary.
fn truncate_chars(text: String, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (text[..byte_index].to_string(), true),
        None => (text, false),
    }
}

pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract(&self, raw: String, params: &ExtractTextParams) -> StepOutput {
        let text = if params.normalize_whitespace {
            normalize_whitespace(&raw)
        } else {
            raw
        };

        let (text, truncated) = match params.max_chars {
            Some(max) => truncate_chars(text, max),
            None => (text, false),
        };

        StepOutput::Text { text, truncated }
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StepProcessor for TextExtractor {
    fn step_type(&self) -> StepType {
        StepType::ExtractText
    }

    async fn process(&self, file: &BatchFile, action: &StepAction) -> Result<StepOutput, StepError> {
        let StepAction::ExtractText(params) = action else {
            return Err(StepError::InvalidParameters(format!(
                "expected extract-text parameters, got {}",
                action.step_type()
            )));
        };

        let raw = read_text(&file.path).await?;
        Ok(self.extract(raw, params))
    }
}

use std::path::Path;
use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use regex::{Captures, Regex};

use crate::batch::BatchFile;
use crate::error::StepError;
use crate::processor::{StepOutput, StepProcessor};
use crate::sanitize::sanitize_filename;
use crate::workflow::{SmartRenameParams, StepAction, StepType};

static RE_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(timestamp|original|ext|y|m|d)").unwrap());

/// Builds a new file name from a pattern.
///
/// `$original` is the file stem, `$ext` the extension, `$y`/`$m`/`$d` the
/// zero-padded date parts and `$timestamp` the unix time of `now`. The
/// extension is appended unless the pattern places it itself. Variables are
/// expanded in one pass, so text inserted for one is never expanded again.
pub fn render_name(
    pattern: &str,
    original_filename: &str,
    now: DateTime<Utc>,
    lowercase: bool,
) -> Result<String, StepError> {
    let path = Path::new(original_filename);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(original_filename);
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let substituted = RE_VARIABLE.replace_all(pattern, |caps: &Captures| match &caps[1] {
        "timestamp" => now.timestamp().to_string(),
        "original" => stem.to_string(),
        "ext" => extension.to_string(),
        "y" => format!("{:04}", now.year()),
        "m" => format!("{:02}", now.month()),
        _ => format!("{:02}", now.day()),
    });

    let mut name = sanitize_filename(&substituted);
    if name.is_empty() || name.chars().all(|c| c == '.') {
        return Err(StepError::InvalidParameters(format!(
            "rename pattern '{}' produced an empty file name",
            pattern
        )));
    }

    if !pattern.contains("$ext") && !extension.is_empty() {
        name = format!("{}.{}", name, extension);
    }

    if lowercase {
        name = name.to_lowercase();
    }

    Ok(name)
}

pub struct SmartRenamer;

impl SmartRenamer {
    pub fn new() -> Self {
        Self
    }

    fn rename(&self, file: &BatchFile, params: &SmartRenameParams) -> Result<StepOutput, StepError> {
        let new_name = render_name(&params.pattern, &file.name, Utc::now(), params.lowercase)?;
        Ok(StepOutput::Rename { new_name })
    }
}

impl Default for SmartRenamer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StepProcessor for SmartRenamer {
    fn step_type(&self) -> StepType {
        StepType::SmartRename
    }

    async fn process(&self, file: &BatchFile, action: &StepAction) -> Result<StepOutput, StepError> {
        match action {
            StepAction::SmartRename(params) => self.rename(file, params),
            other => Err(StepError::InvalidParameters(format!(
                "expected smart-rename parameters, got {}",
                other.step_type()
            ))),
        }
    }
}

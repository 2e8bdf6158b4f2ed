use std::collections::HashMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::batch::BatchFile;
use crate::error::StepError;
use crate::processor::text::read_text;
use crate::processor::{StepOutput, StepProcessor};
use crate::workflow::{AnalyzeContentParams, StepAction, StepType};

static RE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+(?:['-][\p{L}\p{N}]+)*").unwrap());

/// Word, line and character counts plus the most frequent words.
pub fn analyze_text(text: &str, params: &AnalyzeContentParams) -> StepOutput {
    let mut frequencies: HashMap<String, usize> = HashMap::new();
    let mut word_count = 0;

    for word in RE_WORD.find_iter(text) {
        word_count += 1;
        let word = word.as_str().to_lowercase();
        if word.chars().count() >= params.min_word_length {
            *frequencies.entry(word).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = frequencies.into_iter().collect();
    // Highest count first, alphabetical among equals.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    StepOutput::ContentAnalysis {
        word_count,
        line_count: text.lines().count(),
        char_count: text.chars().count(),
        keywords: ranked
            .into_iter()
            .take(params.max_keywords)
            .map(|(word, _)| word)
            .collect(),
    }
}

pub struct ContentAnalyzer;

impl ContentAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ContentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StepProcessor for ContentAnalyzer {
    fn step_type(&self) -> StepType {
        StepType::AnalyzeContent
    }

    async fn process(&self, file: &BatchFile, action: &StepAction) -> Result<StepOutput, StepError> {
        let StepAction::AnalyzeContent(params) = action else {
            return Err(StepError::InvalidParameters(format!(
                "expected analyze-content parameters, got {}",
                action.step_type()
            )));
        };

        let text = read_text(&file.path).await?;
        Ok(analyze_text(&text, params))
    }
}

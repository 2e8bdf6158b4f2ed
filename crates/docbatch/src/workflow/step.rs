use serde::{Deserialize, Serialize};

/// Tag identifying which processor runs a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepType {
    AnalyzeContent,
    ExtractText,
    OcrRecognition,
    SmartRename,
    Categorize,
    OrganizeFolders,
    DetectDuplicates,
    CustomScript,
}

impl StepType {
    pub const ALL: [StepType; 8] = [
        StepType::AnalyzeContent,
        StepType::ExtractText,
        StepType::OcrRecognition,
        StepType::SmartRename,
        StepType::Categorize,
        StepType::OrganizeFolders,
        StepType::DetectDuplicates,
        StepType::CustomScript,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::AnalyzeContent => "analyze-content",
            StepType::ExtractText => "extract-text",
            StepType::OcrRecognition => "ocr-recognition",
            StepType::SmartRename => "smart-rename",
            StepType::Categorize => "categorize",
            StepType::OrganizeFolders => "organize-folders",
            StepType::DetectDuplicates => "detect-duplicates",
            StepType::CustomScript => "custom-script",
        }
    }
}

impl std::fmt::Display for StepType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when a step fails for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorHandlingStrategy {
    /// Fail the file and stop dispatching further files for the job.
    StopJob,
    /// Mark the file skipped and abandon its remaining steps.
    SkipFile,
    /// Run the step once more, then continue if it fails again.
    Retry,
    /// Record the error and move on to the next step.
    Continue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeContentParams {
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,
    #[serde(default = "default_min_word_length")]
    pub min_word_length: usize,
}

fn default_max_keywords() -> usize {
    10
}

fn default_min_word_length() -> usize {
    4
}

impl Default for AnalyzeContentParams {
    fn default() -> Self {
        Self {
            max_keywords: default_max_keywords(),
            min_word_length: default_min_word_length(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractTextParams {
    #[serde(default)]
    pub max_chars: Option<usize>,
    #[serde(default = "default_true")]
    pub normalize_whitespace: bool,
}

impl Default for ExtractTextParams {
    fn default() -> Self {
        Self {
            max_chars: None,
            normalize_whitespace: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrParams {
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

fn default_languages() -> Vec<String> {
    vec!["eng".to_string()]
}

fn default_dpi() -> u32 {
    300
}

impl Default for OcrParams {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            dpi: default_dpi(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartRenameParams {
    /// Name pattern; supports `$original`, `$ext`, `$y`, `$m`, `$d` and `$timestamp`.
    #[serde(default = "default_rename_pattern")]
    pub pattern: String,
    #[serde(default)]
    pub lowercase: bool,
}

fn default_rename_pattern() -> String {
    "$original".to_string()
}

impl Default for SmartRenameParams {
    fn default() -> Self {
        Self {
            pattern: default_rename_pattern(),
            lowercase: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizeParams {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default = "default_fallback_category")]
    pub fallback: String,
}

fn default_fallback_category() -> String {
    "unsorted".to_string()
}

impl Default for CategorizeParams {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            fallback: default_fallback_category(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizeFoldersParams {
    #[serde(default = "default_base_directory")]
    pub base_directory: String,
    #[serde(default = "default_structure")]
    pub structure: String,
}

fn default_base_directory() -> String {
    "organized".to_string()
}

fn default_structure() -> String {
    "$category/$y".to_string()
}

impl Default for OrganizeFoldersParams {
    fn default() -> Self {
        Self {
            base_directory: default_base_directory(),
            structure: default_structure(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectDuplicatesParams {
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

fn default_similarity_threshold() -> f64 {
    0.95
}

impl Default for DetectDuplicatesParams {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomScriptParams {
    pub script: String,
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_true() -> bool {
    true
}

/// A step's type together with its typed parameters.
///
/// Serialized as `{"type": "ocr-recognition", "parameters": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "parameters", rename_all = "kebab-case")]
pub enum StepAction {
    AnalyzeContent(AnalyzeContentParams),
    ExtractText(ExtractTextParams),
    OcrRecognition(OcrParams),
    SmartRename(SmartRenameParams),
    Categorize(CategorizeParams),
    OrganizeFolders(OrganizeFoldersParams),
    DetectDuplicates(DetectDuplicatesParams),
    CustomScript(CustomScriptParams),
}

impl StepAction {
    pub fn step_type(&self) -> StepType {
        match self {
            StepAction::AnalyzeContent(_) => StepType::AnalyzeContent,
            StepAction::ExtractText(_) => StepType::ExtractText,
            StepAction::OcrRecognition(_) => StepType::OcrRecognition,
            StepAction::SmartRename(_) => StepType::SmartRename,
            StepAction::Categorize(_) => StepType::Categorize,
            StepAction::OrganizeFolders(_) => StepType::OrganizeFolders,
            StepAction::DetectDuplicates(_) => StepType::DetectDuplicates,
            StepAction::CustomScript(_) => StepType::CustomScript,
        }
    }

    /// Default parameters for a step type.
    pub fn default_for(step_type: StepType) -> Self {
        match step_type {
            StepType::AnalyzeContent => StepAction::AnalyzeContent(Default::default()),
            StepType::ExtractText => StepAction::ExtractText(Default::default()),
            StepType::OcrRecognition => StepAction::OcrRecognition(Default::default()),
            StepType::SmartRename => StepAction::SmartRename(Default::default()),
            StepType::Categorize => StepAction::Categorize(Default::default()),
            StepType::OrganizeFolders => StepAction::OrganizeFolders(Default::default()),
            StepType::DetectDuplicates => StepAction::DetectDuplicates(Default::default()),
            StepType::CustomScript => StepAction::CustomScript(Default::default()),
        }
    }
}

/// One typed unit of work in a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub id: String,
    pub name: String,
    pub action: StepAction,
    /// Execution position; equal values keep insertion order.
    #[serde(default)]
    pub order: u32,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub error_handling: ErrorHandlingStrategy,
}

impl WorkflowStep {
    pub fn new(name: impl Into<String>, action: StepAction) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            action,
            order: 0,
            enabled: true,
            error_handling: ErrorHandlingStrategy::Continue,
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn with_error_handling(mut self, strategy: ErrorHandlingStrategy) -> Self {
        self.error_handling = strategy;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn step_type(&self) -> StepType {
        self.action.step_type()
    }
}

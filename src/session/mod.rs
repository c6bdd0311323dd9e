pub mod orchestrator;
pub mod prompt;
pub mod validate;

pub use orchestrator::{SessionOutcome, run_generate, run_improve, run_seo, run_translate};

use serde::Deserialize;

use crate::vocab;

/// The four user-triggered operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Generate,
    Improve,
    Translate,
    SeoAnalyze,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OperationKind::Generate => "Generation",
            OperationKind::Improve => "Improvement",
            OperationKind::Translate => "Translation",
            OperationKind::SeoAnalyze => "SEO analysis",
        };
        f.write_str(label)
    }
}

// Request bodies use serde defaults throughout so that a missing field
// reaches the validator as a blank instead of failing deserialization.

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub product_name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub features: String,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_length")]
    pub length: String,
    #[serde(default = "default_num_variants")]
    pub num_variants: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImproveRequest {
    #[serde(default)]
    pub original_description: String,
    #[serde(default)]
    pub improvement_focus: Vec<String>,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeoRequest {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_language")]
    pub source_language: String,
    #[serde(default = "default_target_language")]
    pub target_language: String,
    #[serde(default = "default_true")]
    pub adapt_culturally: bool,
}

fn default_category() -> String {
    vocab::DEFAULT_CATEGORY.to_string()
}

fn default_tone() -> String {
    vocab::DEFAULT_TONE.to_string()
}

fn default_language() -> String {
    vocab::DEFAULT_LANGUAGE.to_string()
}

fn default_target_language() -> String {
    vocab::DEFAULT_TARGET_LANGUAGE.to_string()
}

fn default_length() -> String {
    vocab::DEFAULT_LENGTH.to_string()
}

fn default_num_variants() -> u8 {
    1
}

fn default_true() -> bool {
    true
}

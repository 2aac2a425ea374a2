use serde::{Deserialize, Serialize};
use validator::Validate;

/// Sentinel for `max_tokens` meaning "no output length limit". When set,
/// the length-limit parameter is omitted from generation requests entirely.
pub const MAX_TOKENS_UNBOUNDED: i64 = -1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SizeCategory {
    Small,
    Large,
}

impl std::fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Small => write!(f, "small"),
            Self::Large => write!(f, "large"),
        }
    }
}

/// Configuration for one model under evaluation.
///
/// `name` is the wire name the generation service understands
/// (e.g. "qwen2.5:1.5b"). A full snapshot of this struct is embedded in
/// every persisted result so runs stay reproducible even if the catalog
/// changes later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct ModelConfig {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub display_name: String,
    pub size_category: SizeCategory,
    pub is_reasoning_model: bool,
    pub parameters: String,
    #[validate(length(min = 1))]
    pub supported_strategies: Vec<String>,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub top_p: f64,
    pub max_tokens: i64,
}

impl ModelConfig {
    /// Whether output length is unbounded for this model.
    pub fn is_unbounded(&self) -> bool {
        self.max_tokens == MAX_TOKENS_UNBOUNDED
    }

    /// Wire name with path-unsafe separators replaced, usable as a file
    /// name component.
    pub fn sanitized_name(&self) -> String {
        self.name.replace([':', '/'], "_")
    }
}

//! Static model catalog.
//!
//! Models are defined at process start and immutable afterwards. The keys
//! (`small`, `large`) are what the CLI accepts in `--models`.

use crate::domain::{ModelConfig, SizeCategory, MAX_TOKENS_UNBOUNDED};
use crate::error::{EvalError, Result};

/// Immutable registry of the configured models, in definition order.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    entries: Vec<(String, ModelConfig)>,
}

impl ModelCatalog {
    /// Build the catalog with the benchmark's model set.
    pub fn new() -> Self {
        let entries = vec![
            (
                "small".to_string(),
                ModelConfig {
                    name: "qwen2.5:1.5b".to_string(),
                    display_name: "Qwen 2.5 (1.5B)".to_string(),
                    size_category: SizeCategory::Small,
                    is_reasoning_model: false,
                    parameters: "1.5B".to_string(),
                    supported_strategies: vec![
                        "zero_shot".to_string(),
                        "few_shot".to_string(),
                        "chain_of_thought".to_string(),
                    ],
                    temperature: 0.7,
                    top_p: 0.9,
                    // Let the model generate its full response.
                    max_tokens: MAX_TOKENS_UNBOUNDED,
                },
            ),
            (
                "large".to_string(),
                ModelConfig {
                    name: "deepseek-r1:7b".to_string(),
                    display_name: "DeepSeek R1 (7B)".to_string(),
                    size_category: SizeCategory::Large,
                    is_reasoning_model: true,
                    parameters: "7B".to_string(),
                    // No chain-of-thought: the model already reasons internally.
                    supported_strategies: vec!["zero_shot".to_string(), "few_shot".to_string()],
                    temperature: 0.7,
                    top_p: 0.9,
                    max_tokens: MAX_TOKENS_UNBOUNDED,
                },
            ),
        ];

        Self { entries }
    }

    /// Look up a model by catalog key. Unknown keys fail with the list of
    /// valid keys.
    pub fn get(&self, key: &str) -> Result<&ModelConfig> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, m)| m)
            .ok_or_else(|| {
                EvalError::NotFound(format!(
                    "Model '{}' not found. Available models: {}",
                    key,
                    self.keys().join(", ")
                ))
            })
    }

    /// All configured models, in definition order.
    pub fn all(&self) -> Vec<&ModelConfig> {
        self.entries.iter().map(|(_, m)| m).collect()
    }

    /// Catalog keys, in definition order.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Key/model pairs, in definition order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ModelConfig)> {
        self.entries.iter().map(|(k, m)| (k.as_str(), m))
    }

    /// Models in a given size category.
    pub fn by_category(&self, category: SizeCategory) -> Vec<&ModelConfig> {
        self.entries
            .iter()
            .map(|(_, m)| m)
            .filter(|m| m.size_category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::PromptStrategy;
    use validator::Validate;

    #[test]
    fn catalog_has_small_and_large() {
        let catalog = ModelCatalog::new();
        assert_eq!(catalog.keys(), vec!["small", "large"]);
        assert_eq!(catalog.get("small").unwrap().name, "qwen2.5:1.5b");
        assert_eq!(catalog.get("large").unwrap().name, "deepseek-r1:7b");
    }

    #[test]
    fn unknown_key_lists_valid_keys() {
        let catalog = ModelCatalog::new();
        let err = catalog.get("medium").unwrap_err().to_string();
        assert!(err.contains("medium"));
        assert!(err.contains("small"));
        assert!(err.contains("large"));
    }

    #[test]
    fn every_configured_strategy_resolves() {
        let catalog = ModelCatalog::new();
        for model in catalog.all() {
            for name in &model.supported_strategies {
                assert!(PromptStrategy::from_name(name).is_ok(), "bad strategy {name}");
            }
        }
    }

    #[test]
    fn all_models_pass_validation() {
        for model in ModelCatalog::new().all() {
            assert!(model.validate().is_ok());
        }
    }

    #[test]
    fn by_category_filters() {
        let catalog = ModelCatalog::new();
        let small = catalog.by_category(SizeCategory::Small);
        assert_eq!(small.len(), 1);
        assert_eq!(small[0].name, "qwen2.5:1.5b");
    }
}

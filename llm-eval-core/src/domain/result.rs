use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::model::ModelConfig;

/// Prefix written into `response` when a cell's generation call failed.
/// Failed cells are recorded, not dropped.
pub const ERROR_MARKER: &str = "ERROR: ";

/// One persisted evaluation record: the unit of stored state.
///
/// The generation phase fills everything except `scores`, `total_score`
/// and `evaluator_notes`; those are added afterwards by a human editing
/// the stored JSON. The only in-program mutation is the total-score
/// recomputation pass in the result store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationResult {
    // Identifiers (natural composite key within a run)
    pub task_id: String,
    pub model_name: String,
    pub strategy: String,

    // Input/output
    pub prompt: String,
    pub response: String,

    // Metadata
    pub timestamp: String,
    pub model_config: ModelConfig,

    // Performance
    pub generation_time_ms: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,

    // Scoring (filled in manually later)
    pub scores: Option<BTreeMap<String, i64>>,
    pub total_score: Option<i64>,
    pub evaluator_notes: Option<String>,
}

impl EvaluationResult {
    /// Create an unscored record for one executed matrix cell, stamped now.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        task_id: impl Into<String>,
        model: &ModelConfig,
        strategy: impl Into<String>,
        prompt: impl Into<String>,
        response: impl Into<String>,
        generation_time_ms: u64,
        prompt_tokens: u64,
        completion_tokens: u64,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            model_name: model.name.clone(),
            strategy: strategy.into(),
            prompt: prompt.into(),
            response: response.into(),
            timestamp: Utc::now().to_rfc3339(),
            model_config: model.clone(),
            generation_time_ms,
            prompt_tokens,
            completion_tokens,
            scores: None,
            total_score: None,
            evaluator_notes: None,
        }
    }

    /// Whether a human has filled in the per-criterion scores.
    pub fn is_scored(&self) -> bool {
        self.scores.is_some()
    }

    /// Sum of the per-criterion scores, when present.
    pub fn computed_total(&self) -> Option<i64> {
        self.scores.as_ref().map(|s| s.values().sum())
    }

    /// Whether the generation call for this cell failed.
    pub fn is_failed(&self) -> bool {
        self.response.starts_with(ERROR_MARKER)
    }

    /// File name for this record within a run directory:
    /// `<task_id>_<sanitized_model>_<strategy>.json`.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}.json",
            self.task_id,
            self.model_config.sanitized_name(),
            self.strategy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SizeCategory;

    fn model() -> ModelConfig {
        ModelConfig {
            name: "deepseek-r1:7b".to_string(),
            display_name: "DeepSeek R1 (7B)".to_string(),
            size_category: SizeCategory::Large,
            is_reasoning_model: true,
            parameters: "7B".to_string(),
            supported_strategies: vec!["zero_shot".to_string(), "few_shot".to_string()],
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: -1,
        }
    }

    #[test]
    fn new_result_is_unscored() {
        let result =
            EvaluationResult::new("logic", &model(), "zero_shot", "prompt", "answer", 1200, 42, 88);
        assert!(!result.is_scored());
        assert_eq!(result.total_score, None);
        assert_eq!(result.computed_total(), None);
        assert!(!result.is_failed());
    }

    #[test]
    fn computed_total_sums_scores() {
        let mut result =
            EvaluationResult::new("logic", &model(), "zero_shot", "p", "r", 0, 0, 0);
        result.scores = Some(BTreeMap::from([
            ("a".to_string(), 3),
            ("b".to_string(), 4),
        ]));
        assert_eq!(result.computed_total(), Some(7));
    }

    #[test]
    fn file_name_uses_sanitized_model() {
        let result = EvaluationResult::new("logic", &model(), "few_shot", "p", "r", 0, 0, 0);
        assert_eq!(result.file_name(), "logic_deepseek-r1_7b_few_shot.json");
    }

    #[test]
    fn error_marker_flags_failure() {
        let result = EvaluationResult::new(
            "logic",
            &model(),
            "zero_shot",
            "p",
            format!("{}connection refused", ERROR_MARKER),
            5,
            0,
            0,
        );
        assert!(result.is_failed());
    }

    #[test]
    fn round_trips_through_json() {
        let result =
            EvaluationResult::new("logic", &model(), "zero_shot", "prompt", "answer", 10, 1, 2);
        let json = serde_json::to_string(&result).unwrap();
        let back: EvaluationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}

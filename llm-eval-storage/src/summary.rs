use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use llm_eval_core::EvaluationResult;

/// Aggregate statistics for a set of results. All figures are re-derived
/// from the stored files on every call; nothing trusts in-memory order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub total_evaluations: usize,
    pub tasks: Vec<String>,
    pub models: Vec<String>,
    pub strategies: Vec<String>,
    pub total_generation_time_sec: f64,
    pub average_generation_time_sec: f64,
    pub total_tokens_generated: u64,
    pub evaluated_results: usize,
    pub pending_evaluation: usize,
}

impl RunSummary {
    /// Compute a summary over loaded results. Returns `None` for an empty
    /// set so callers never divide by zero.
    pub fn from_results(results: &[EvaluationResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }

        let distinct = |f: fn(&EvaluationResult) -> &str| -> Vec<String> {
            results
                .iter()
                .map(|r| f(r).to_string())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };

        let total_ms: u64 = results.iter().map(|r| r.generation_time_ms).sum();
        let scored = results.iter().filter(|r| r.is_scored()).count();

        Some(Self {
            total_evaluations: results.len(),
            tasks: distinct(|r| &r.task_id),
            models: distinct(|r| &r.model_name),
            strategies: distinct(|r| &r.strategy),
            total_generation_time_sec: total_ms as f64 / 1000.0,
            average_generation_time_sec: total_ms as f64 / results.len() as f64 / 1000.0,
            total_tokens_generated: results.iter().map(|r| r.completion_tokens).sum(),
            evaluated_results: scored,
            pending_evaluation: results.len() - scored,
        })
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Marker used in task content that has not been authored yet. A task
/// carrying this marker in any required field is excluded from runs.
pub const PLACEHOLDER_MARKER: &str = "TODO";

/// A single worked example used by the few-shot strategy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskExample {
    pub input: String,
    pub output: String,
    pub explanation: Option<String>,
}

impl TaskExample {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            explanation: None,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}

/// A hand-authored evaluation task.
///
/// Tasks are immutable once constructed. Completeness is computed from the
/// content rather than stored: a task is eligible for execution only when
/// every required field is authored (non-empty, no placeholder marker) and
/// the scoring rubric is non-empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub evaluation_input: String,
    pub expected_output_characteristics: String,
    pub development_examples: Vec<TaskExample>,
    pub evaluation_criteria: BTreeMap<String, String>,
    pub scoring_rubric: BTreeMap<String, u32>,
}

impl Task {
    /// Maximum achievable score: the sum of the rubric point values.
    pub fn max_score(&self) -> u32 {
        self.scoring_rubric.values().sum()
    }

    /// Whether the task content is fully authored and ready to run.
    pub fn is_complete(&self) -> bool {
        self.incomplete_fields().is_empty()
    }

    /// Names of fields that are empty or still carry the placeholder marker.
    pub fn incomplete_fields(&self) -> Vec<&'static str> {
        let mut incomplete = Vec::new();

        let text_fields = [
            ("description", &self.description),
            ("evaluation_input", &self.evaluation_input),
            (
                "expected_output_characteristics",
                &self.expected_output_characteristics,
            ),
        ];
        for (field, value) in text_fields {
            if value.trim().is_empty() || value.contains(PLACEHOLDER_MARKER) {
                incomplete.push(field);
            }
        }

        if self.scoring_rubric.is_empty() {
            incomplete.push("scoring_rubric");
        }
        if self.evaluation_criteria.is_empty() {
            incomplete.push("evaluation_criteria");
        }

        incomplete
    }
}

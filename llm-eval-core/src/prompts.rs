//! Prompt-construction strategies.
//!
//! The strategy set is closed and small, so it is modeled as an enum
//! dispatched through [`PromptStrategy::build_prompt`] rather than an open
//! trait hierarchy.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::domain::Task;
use crate::error::{EvalError, Result};

/// Number of worked examples included by the few-shot strategy.
const FEW_SHOT_EXAMPLES: usize = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PromptStrategy {
    /// Just the task description and input, no examples.
    ZeroShot,
    /// Worked examples before the actual task.
    FewShot,
    /// Explicit step-by-step instructions. Not meant for reasoning models,
    /// which deliberate on their own.
    ChainOfThought,
}

impl PromptStrategy {
    /// The fixed set of strategies, in display order.
    pub fn all() -> &'static [PromptStrategy] {
        &[Self::ZeroShot, Self::FewShot, Self::ChainOfThought]
    }

    /// Wire name used in model catalogs and persisted results.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ZeroShot => "zero_shot",
            Self::FewShot => "few_shot",
            Self::ChainOfThought => "chain_of_thought",
        }
    }

    /// Resolve a strategy by wire name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "zero_shot" => Ok(Self::ZeroShot),
            "few_shot" => Ok(Self::FewShot),
            "chain_of_thought" => Ok(Self::ChainOfThought),
            _ => Err(EvalError::UnknownStrategy {
                name: name.to_string(),
                available: Self::all()
                    .iter()
                    .map(|s| s.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    /// Build the prompt text for a task under this strategy.
    pub fn build_prompt(&self, task: &Task) -> String {
        match self {
            Self::ZeroShot => Self::zero_shot(task),
            Self::FewShot => Self::few_shot(task),
            Self::ChainOfThought => Self::chain_of_thought(task),
        }
    }

    fn zero_shot(task: &Task) -> String {
        format!("{}\n\n{}", task.description, task.evaluation_input)
    }

    fn few_shot(task: &Task) -> String {
        if task.development_examples.is_empty() {
            // No examples authored: degrade to zero-shot.
            return Self::zero_shot(task);
        }

        let mut examples_text = String::from("Here are some examples:\n\n");
        for (i, example) in task
            .development_examples
            .iter()
            .take(FEW_SHOT_EXAMPLES)
            .enumerate()
        {
            let _ = writeln!(examples_text, "Example {}:", i + 1);
            let _ = writeln!(examples_text, "Input: {}", example.input);
            let _ = writeln!(examples_text, "Output: {}", example.output);
            if let Some(ref explanation) = example.explanation {
                let _ = writeln!(examples_text, "Explanation: {}", explanation);
            }
            examples_text.push('\n');
        }

        format!(
            "{}\n\n{}Now solve this:\n{}",
            task.description, examples_text, task.evaluation_input
        )
    }

    fn chain_of_thought(task: &Task) -> String {
        format!(
            "{}\n\n{}\n\nLet's approach this step by step:\n\
             1. First, analyze the problem carefully\n\
             2. Then, work through it systematically\n\
             3. Finally, provide your answer\n\n\
             Please show your reasoning at each step.",
            task.description, task.evaluation_input
        )
    }
}

impl std::fmt::Display for PromptStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

//! Static task catalog.
//!
//! Each task is built by its own constructor function and registered once
//! at startup. Insertion order is the matrix order for evaluation runs.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{Task, TaskExample};

/// Immutable registry of the evaluation tasks.
#[derive(Debug, Clone)]
pub struct TaskCatalog {
    tasks: Vec<Task>,
}

impl TaskCatalog {
    /// Build the catalog with all hand-authored task definitions.
    pub fn new() -> Self {
        let tasks = vec![
            logical_reasoning(),
            instruction_following(),
            math_solving(),
            creative_writing(),
            ethical_reasoning(),
        ];

        for task in &tasks {
            debug!(task_id = %task.id, complete = task.is_complete(), "loaded task");
        }

        Self { tasks }
    }

    /// Look up a task by id.
    pub fn get(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// All tasks, in registration order.
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    /// All task ids, in registration order.
    pub fn ids(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.id.as_str()).collect()
    }

    /// Tasks in a given category.
    pub fn by_category(&self, category: &str) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.category == category).collect()
    }

    pub fn count_complete(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_complete()).count()
    }

    pub fn count_incomplete(&self) -> usize {
        self.tasks.len() - self.count_complete()
    }

    /// Incomplete field names per task, for tasks that have any.
    pub fn validation_report(&self) -> BTreeMap<String, Vec<&'static str>> {
        self.tasks
            .iter()
            .filter_map(|t| {
                let fields = t.incomplete_fields();
                if fields.is_empty() {
                    None
                } else {
                    Some((t.id.clone(), fields))
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Default for TaskCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn logical_reasoning() -> Task {
    Task {
        id: "logical_reasoning".to_string(),
        name: "Logical Reasoning".to_string(),
        category: "Reasoning".to_string(),
        description: "This task evaluates the model's ability to apply formal logical rules, \
                      identify valid and invalid inferences, and reason from given premises to \
                      sound conclusions."
            .to_string(),
        evaluation_input: "Consider the following premises:\n\n\
            1. All successful entrepreneurs take calculated risks.\n\
            2. Some people who take calculated risks fail in their ventures.\n\
            3. Maria is a successful entrepreneur.\n\
            4. Everyone who fails in their ventures learns valuable lessons.\n\n\
            Answer with logical reasoning:\n\n\
            a) Can we conclude that Maria takes calculated risks?\n\
            b) Can we conclude that Maria has failed in her ventures? Why or why not?\n\
            c) If someone learns valuable lessons, does that necessarily mean they failed \
            in their ventures?"
            .to_string(),
        expected_output_characteristics: "A response that reasons formally, correctly \
            distinguishes what can and cannot be concluded from the premises, avoids fallacies \
            such as affirming the consequent, and separates necessary from possible conclusions."
            .to_string(),
        development_examples: vec![
            TaskExample::new(
                "Given: All birds have feathers. Penguins are birds. Penguins cannot fly.\n\
                 Question: Is having feathers sufficient for being able to fly?",
                "No. Penguins have feathers (all birds do, and penguins are birds) yet cannot \
                 fly, so feathers cannot be a sufficient condition for flight.",
            )
            .with_explanation(
                "Uses a counterexample to refute a universal claim and distinguishes necessary \
                 from sufficient conditions.",
            ),
            TaskExample::new(
                "If it rains, the ground gets wet. The ground is wet. Did it rain?",
                "Not necessarily. This would be affirming the consequent: rain is one cause of a \
                 wet ground, but sprinklers, dew or a burst pipe would also explain it.",
            )
            .with_explanation("Identifies the fallacy of affirming the consequent."),
        ],
        evaluation_criteria: BTreeMap::from([
            (
                "logical_validity".to_string(),
                "Reasoning follows logical rules and principles".to_string(),
            ),
            (
                "completeness".to_string(),
                "Addresses all parts of the problem".to_string(),
            ),
            (
                "clarity".to_string(),
                "Explanation is clear and well-structured".to_string(),
            ),
        ]),
        scoring_rubric: BTreeMap::from([
            ("logical_validity".to_string(), 10),
            ("completeness".to_string(), 5),
            ("clarity".to_string(), 5),
        ]),
    }
}

fn instruction_following() -> Task {
    Task {
        id: "instruction_following".to_string(),
        name: "Instruction Following".to_string(),
        category: "Compliance".to_string(),
        description: "This task evaluates how precisely the model follows a set of explicit, \
                      slightly unusual formatting and content constraints."
            .to_string(),
        evaluation_input: "Write a short product description for a reusable water bottle, \
            following ALL of these rules:\n\n\
            1. Exactly three sentences.\n\
            2. The second sentence must contain exactly seven words.\n\
            3. Do not use the letter 'z' anywhere.\n\
            4. End the last sentence with the word 'today'.\n\
            5. Mention one environmental benefit."
            .to_string(),
        expected_output_characteristics: "Output that satisfies every constraint \
            simultaneously: sentence count, word count in the second sentence, the banned \
            letter, the closing word, and the required content element."
            .to_string(),
        development_examples: vec![TaskExample::new(
            "Write one sentence about coffee that contains exactly five words and ends with \
             'morning'.",
            "Coffee brightens up my morning.",
        )
        .with_explanation("Five words, topic respected, required final word in place.")],
        evaluation_criteria: BTreeMap::from([
            (
                "constraint_adherence".to_string(),
                "Every explicit rule is satisfied".to_string(),
            ),
            (
                "content_quality".to_string(),
                "The text still reads naturally despite the constraints".to_string(),
            ),
        ]),
        scoring_rubric: BTreeMap::from([
            ("constraint_adherence".to_string(), 12),
            ("content_quality".to_string(), 8),
        ]),
    }
}

fn math_solving() -> Task {
    Task {
        id: "math_solving".to_string(),
        name: "Math Problem Solving".to_string(),
        category: "Math".to_string(),
        description: "This task evaluates multi-step arithmetic and algebraic reasoning on a \
                      word problem, including setting up the right equations."
            .to_string(),
        evaluation_input: "A bookstore sells paperbacks for 8 euros and hardcovers for 14 \
            euros. On Saturday it sold 45 books in total for 456 euros. A customer then \
            returned two hardcovers for a full refund.\n\n\
            a) How many paperbacks and how many hardcovers were sold before the return?\n\
            b) What is the store's revenue after the refund?\n\n\
            Show your working."
            .to_string(),
        expected_output_characteristics: "Correct system of equations, correct solution \
            (29 paperbacks, 16 hardcovers), correct post-refund revenue (428 euros), with \
            intermediate steps shown."
            .to_string(),
        development_examples: vec![TaskExample::new(
            "Tickets cost 5 euros for children and 9 euros for adults. 12 tickets were sold \
             for 76 euros. How many of each?",
            "Let c be child tickets and a adult tickets. c + a = 12 and 5c + 9a = 76. \
             Substituting c = 12 - a gives 60 + 4a = 76, so a = 4 and c = 8. \
             8 child tickets and 4 adult tickets.",
        )],
        evaluation_criteria: BTreeMap::from([
            (
                "correctness".to_string(),
                "Final answers are numerically correct".to_string(),
            ),
            (
                "method".to_string(),
                "Equations are set up and solved soundly".to_string(),
            ),
            (
                "presentation".to_string(),
                "Working is shown and easy to follow".to_string(),
            ),
        ]),
        scoring_rubric: BTreeMap::from([
            ("correctness".to_string(), 10),
            ("method".to_string(), 6),
            ("presentation".to_string(), 4),
        ]),
    }
}

fn creative_writing() -> Task {
    Task {
        id: "creative_writing".to_string(),
        name: "Creative Writing".to_string(),
        category: "Generation".to_string(),
        description: "This task evaluates the model's ability to produce a short piece of \
                      original fiction with a required narrative element and consistent tone."
            .to_string(),
        evaluation_input: "Write a story of at most 200 words about a lighthouse keeper who \
            discovers that the light attracts something other than ships. The story must be \
            told in the first person, maintain a quietly uneasy tone throughout, and end on \
            an unresolved note."
            .to_string(),
        expected_output_characteristics: "A coherent first-person narrative within the length \
            limit, sustained uneasy atmosphere, the required discovery as a plot element, and \
            a deliberately unresolved ending rather than a tidy conclusion."
            .to_string(),
        development_examples: vec![],
        evaluation_criteria: BTreeMap::from([
            (
                "craft".to_string(),
                "Prose quality, imagery and economy of language".to_string(),
            ),
            (
                "brief_adherence".to_string(),
                "Perspective, tone, length and ending match the brief".to_string(),
            ),
            (
                "originality".to_string(),
                "The central idea avoids cliche".to_string(),
            ),
        ]),
        scoring_rubric: BTreeMap::from([
            ("craft".to_string(), 8),
            ("brief_adherence".to_string(), 8),
            ("originality".to_string(), 4),
        ]),
    }
}

// Not yet authored; excluded from runs until the content is written.
fn ethical_reasoning() -> Task {
    Task {
        id: "ethical_reasoning".to_string(),
        name: "Ethical Reasoning".to_string(),
        category: "Reasoning".to_string(),
        description: "This task evaluates the model's ability to weigh competing ethical \
                      considerations in a realistic dilemma."
            .to_string(),
        evaluation_input: "TODO: author the dilemma scenario and the questions".to_string(),
        expected_output_characteristics: "TODO: describe what a strong response looks like"
            .to_string(),
        development_examples: vec![],
        evaluation_criteria: BTreeMap::new(),
        scoring_rubric: BTreeMap::new(),
    }
}

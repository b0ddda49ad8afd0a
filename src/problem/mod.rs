pub mod loader;

use serde::{Deserialize, Serialize};

/// A single code fragment. Blocks are matched by `text` alone, so two blocks
/// with the same text are interchangeable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub text: String,
    pub correct: bool,
}

impl Block {
    pub fn correct(text: &str) -> Self {
        Self {
            text: text.to_string(),
            correct: true,
        }
    }

    pub fn distractor(text: &str) -> Self {
        Self {
            text: text.to_string(),
            correct: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub prompt: String,
    /// Canonical solution, in order.
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub distractors: Vec<Block>,
}

impl Problem {
    pub fn solution_texts(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.text.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemSet {
    pub problems: Vec<Problem>,
}

impl ProblemSet {
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Problem> {
        self.problems.get(index)
    }
}

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const GENERATE_PATH: &str = "/generate-problems";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConceptError {
    #[error("concept \"{0}\" must look like difficulty:name or difficulty:name=false")]
    Malformed(String),
    #[error("concept \"{0}\" has a value other than true/false")]
    BadFlag(String),
}

/// Request body for the problem-generation service: which concepts to cover
/// at which difficulty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSpec {
    pub language: String,
    pub concepts: BTreeMap<String, BTreeMap<String, bool>>,
    pub num_problems: u32,
}

/// One `difficulty:concept[=bool]` selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConceptFlag {
    pub difficulty: String,
    pub concept: String,
    pub enabled: bool,
}

impl ConceptFlag {
    pub fn parse(arg: &str) -> Result<Self, ConceptError> {
        let (difficulty, rest) = arg
            .split_once(':')
            .ok_or_else(|| ConceptError::Malformed(arg.to_string()))?;
        let (concept, enabled) = match rest.split_once('=') {
            Some((name, "true")) => (name, true),
            Some((name, "false")) => (name, false),
            Some(_) => return Err(ConceptError::BadFlag(arg.to_string())),
            None => (rest, true),
        };
        let difficulty = difficulty.trim();
        let concept = concept.trim();
        if difficulty.is_empty() || concept.is_empty() {
            return Err(ConceptError::Malformed(arg.to_string()));
        }
        Ok(Self {
            difficulty: difficulty.to_string(),
            concept: concept.to_string(),
            enabled,
        })
    }
}

impl GeneratorSpec {
    pub fn new(language: &str, num_problems: u32) -> Self {
        Self {
            language: language.to_string(),
            concepts: BTreeMap::new(),
            num_problems,
        }
    }

    pub fn with_concepts(mut self, flags: impl IntoIterator<Item = ConceptFlag>) -> Self {
        for flag in flags {
            self.concepts
                .entry(flag.difficulty)
                .or_default()
                .insert(flag.concept, flag.enabled);
        }
        self
    }

    /// Base64 (standard alphabet) of the JSON encoding.
    pub fn encode(&self) -> serde_json::Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(STANDARD.encode(json))
    }

    pub fn request_url(&self, base_url: &str) -> serde_json::Result<String> {
        Ok(format!(
            "{}{GENERATE_PATH}?specification={}",
            base_url.trim_end_matches('/'),
            self.encode()?
        ))
    }
}

/// Pretty-print a response body if it is JSON, otherwise return it verbatim.
pub fn pretty_body(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    }
}

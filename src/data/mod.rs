//! Input data: entity mentions and the external collaborators that produce them

pub mod sentences;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use sentences::{parse_sentences, PreRecognized};

/// A single recognized entity mention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "sentences::MentionRepr")]
pub struct Mention {
    /// Exact surface form
    pub text: String,

    /// Opaque category tag (PERSON, ORG, ...)
    pub label: String,
}

impl Mention {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Mentions of one sentence, in recognizer order with duplicates preserved
pub type Sentence = Vec<Mention>;

/// Turns a document source into plain text
pub trait TextExtractor {
    fn extract_text(&self, source: &Path) -> anyhow::Result<String>;
}

/// Splits text into sentences of entity mentions
pub trait EntityRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<Sentence>>;
}

/// Reads already-extracted UTF-8 text from disk
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, source: &Path) -> anyhow::Result<String> {
        log::info!("Reading document: {}", source.display());

        if !source.exists() {
            return Err(anyhow::anyhow!("File not found: {}", source.display()));
        }

        Ok(std::fs::read_to_string(source)?)
    }
}

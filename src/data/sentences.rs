//! JSON format for pre-recognized sentence streams
//!
//! A document is an array of sentences; each sentence is an array of
//! mentions written either as `["Alice", "PERSON"]` or as
//! `{"text": "Alice", "label": "PERSON"}`.

use crate::data::{EntityRecognizer, Mention, Sentence};
use crate::error::{GraphError, Result};
use serde::Deserialize;

/// Accepted wire shapes of a mention
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum MentionRepr {
    Pair(String, String),
    Object { text: String, label: String },
}

impl From<MentionRepr> for Mention {
    fn from(repr: MentionRepr) -> Self {
        match repr {
            MentionRepr::Pair(text, label) | MentionRepr::Object { text, label } => {
                Mention { text, label }
            }
        }
    }
}

/// Parse a JSON sentence stream
pub fn parse_sentences(raw: &str) -> Result<Vec<Sentence>> {
    let sentences: Vec<Sentence> = serde_json::from_str(raw)
        .map_err(|e| GraphError::Input(format!("invalid sentence stream: {}", e)))?;

    log::debug!(
        "Parsed {} sentences with {} mentions",
        sentences.len(),
        sentences.iter().map(Vec::len).sum::<usize>()
    );

    Ok(sentences)
}

/// Recognizer for text that already carries its entities as JSON
#[derive(Debug, Default, Clone, Copy)]
pub struct PreRecognized;

impl EntityRecognizer for PreRecognized {
    fn recognize(&self, text: &str) -> Result<Vec<Sentence>> {
        parse_sentences(text)
    }
}

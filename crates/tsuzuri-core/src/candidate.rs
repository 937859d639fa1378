//! Conversion candidates and the result shape returned by the provider.

use serde::{Deserialize, Serialize};

/// How much of the composing buffer a candidate consumes when committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComposingExtent {
    /// Counted in input pieces (separators included).
    Units(usize),
    /// Counted in convert-target characters.
    Chars(usize),
}

/// Backing linguistic data behind a candidate: one dictionary word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub ruby: String,
    /// Grammatical classification id.
    pub class_id: u32,
    /// Topic/meaning id.
    pub topic_id: u32,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub text: String,
    /// Relevance score; higher ranks earlier.
    pub score: f64,
    pub extent: ComposingExtent,
    pub entries: Vec<WordEntry>,
    /// Whether selecting this candidate inserts text (some provider-side
    /// candidates only carry side actions).
    pub inputable: bool,
}

impl Candidate {
    /// A bare candidate with no backing data.
    pub fn plain(text: impl Into<String>, score: f64, extent: ComposingExtent) -> Self {
        Candidate {
            text: text.into(),
            score,
            extent,
            entries: Vec::new(),
            inputable: true,
        }
    }

    /// A single-word candidate whose word and ruby are given explicitly.
    pub fn with_word(text: impl Into<String>, ruby: impl Into<String>, extent: ComposingExtent) -> Self {
        let text = text.into();
        let ruby = ruby.into();
        Candidate {
            entries: vec![WordEntry {
                word: text.clone(),
                ruby: ruby.clone(),
                class_id: 0,
                topic_id: 0,
                score: 0.0,
            }],
            text,
            score: 0.0,
            extent,
            inputable: true,
        }
    }

    /// Concatenated ruby of the backing entries, if any exist.
    pub fn joined_ruby(&self) -> Option<String> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.iter().map(|e| e.ruby.as_str()).collect())
        }
    }
}

/// What one conversion request yields: full-buffer candidates plus
/// first-clause candidates used for the merged list heuristic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionResult {
    /// Candidates covering the whole remaining buffer.
    pub main_results: Vec<Candidate>,
    /// Candidates covering only the leading clause.
    pub first_clause_results: Vec<Candidate>,
}

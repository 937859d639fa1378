//! Suggestion requests handed to an external completion backend.
//!
//! The session never blocks on suggestions. It emits a request with a
//! generation number; the embedder fulfills it asynchronously and
//! feeds results back, which are dropped if the generation moved on.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionRequest {
    /// Text left of the caret, for conditioning.
    pub prompt: String,
    /// The composing text to replace or continue.
    pub target: String,
    /// Staleness token; responses must echo it back.
    pub generation: u64,
}

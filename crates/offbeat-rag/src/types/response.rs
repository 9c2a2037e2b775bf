//! Retrieval and answer types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A passage returned by the similarity search store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// The document's text field
    pub text: String,
    /// Similarity score, `cosine + 1.0` (0.0-2.0, higher is better)
    pub score: f32,
}

impl RetrievedPassage {
    pub fn new(text: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            score,
        }
    }
}

/// A single completion from the answer generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
}

/// Response from a travel query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated answer, passed through from the generator unmodified
    pub answer: String,
    /// Passages the answer was grounded on, in retrieval order
    pub passages: Vec<RetrievedPassage>,
    /// Generation model identifier
    pub model: String,
    /// Correlation id, also present in the query's log events
    pub request_id: Uuid,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

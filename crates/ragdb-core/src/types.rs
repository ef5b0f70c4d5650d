//! Domain types shared by the retrieval store and the answer pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type FragmentId = String;
pub type Meta = HashMap<String, String>;

/// A scored unit of retrieved text proposed as context for a question.
///
/// - `id`: fragment identifier, unique within one query's result set
/// - `text`: the text payload
/// - `score`: normalized similarity in [0, 1], higher is better
/// - `metadata`: scalar metadata; may carry a `source` or `file_name` key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateFragment {
    pub id: FragmentId,
    pub text: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: Meta,
}

/// A candidate that survived filtering, ordering and budget capping,
/// together with its 1-based position in the final sequence.
///
/// Rank is assigned once, after selection, and is stable for the lifetime
/// of one response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedFragment {
    pub fragment: CandidateFragment,
    pub rank: usize,
}

/// Externally visible record for one cited fragment.
///
/// `citation_id` always equals `rank`; this is the binding contract between
/// the `[n]` markers in the answer text and the returned source list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub id: FragmentId,
    pub citation_id: usize,
    pub score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub rank: usize,
    pub text: String,
    pub metadata: Meta,
}

/// Incoming query payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    /// Optional cap on returned fragments; falls back to the configured
    /// default when absent. Clamped to the configured hard ceiling.
    #[serde(default)]
    pub max_sources: Option<usize>,
}

/// Full response: answer text with a Sources section plus the matching
/// source records, ready for serialization by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<SourceRecord>,
}

/// A chunk of a corpus document as written to the vector store.
///
/// `id` is globally unique (`doc_id:chunk_index`); `source` is the logical
/// source name surfaced in citations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: String,
    pub doc_id: String,
    pub doc_path: String,
    pub source: String,
    pub content: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

impl CandidateFragment {
    /// Logical source name for citations: `source` key first, then
    /// `file_name`, else none.
    pub fn source_name(&self) -> Option<&str> {
        self.metadata
            .get("source")
            .or_else(|| self.metadata.get("file_name"))
            .map(String::as_str)
    }
}

//! High-level question answering over an injected retriever.

use tracing::info;

use ragdb_core::config::RetrievalConfig;
use ragdb_core::error::Result;
use ragdb_core::traits::Retriever;
use ragdb_core::types::{QueryRequest, QueryResponse};

use crate::citations::format_sources;
use crate::composer::compose_answer;
use crate::selector::select_fragments;

/// Retrieve → select → compose → format.
///
/// The retriever and configuration are injected at construction; the service
/// holds no other state, so one instance can serve concurrent requests.
pub struct RagService<R: Retriever> {
    retriever: R,
    config: RetrievalConfig,
}

impl<R: Retriever> RagService<R> {
    pub fn new(retriever: R, config: RetrievalConfig) -> Self {
        Self { retriever, config }
    }

    /// Answer a question with citations.
    ///
    /// Retrieval failures surface unchanged; an empty candidate pool is not
    /// an error and produces the fixed fallback answer with no sources.
    pub fn answer_question(&self, request: &QueryRequest) -> Result<QueryResponse> {
        let question = request.question.trim();
        let max_sources = self.config.clamp_top_k(request.max_sources);
        info!(max_sources, "answering question");

        let n_results = max_sources.max(self.config.default_top_k);
        let candidates = self.retriever.similarity_search(question, n_results)?;

        let selected = select_fragments(
            candidates,
            self.config.min_score,
            max_sources,
            self.config.max_context_chars,
        );

        let answer = compose_answer(question, &selected);
        let sources = format_sources(&selected);
        Ok(QueryResponse { answer, sources })
    }
}

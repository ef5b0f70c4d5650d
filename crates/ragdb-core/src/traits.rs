use crate::error::Result;
use crate::types::CandidateFragment;

/// Computes fixed-dimension, L2-normalized vectors for texts.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// The retrieval collaborator: produces scored candidate fragments for a
/// query. Scores are already normalized into [0, 1]; the pipeline treats
/// them as given and never reinterprets distances.
pub trait Retriever: Send + Sync {
    fn similarity_search(&self, query: &str, n_results: usize) -> Result<Vec<CandidateFragment>>;
}

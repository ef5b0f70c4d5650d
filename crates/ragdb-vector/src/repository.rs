//! Retrieval repository over a LanceDB fragments table.
//!
//! Hides the store details behind the core `Retriever` trait and returns
//! candidates with similarity scores normalized into [0, 1]. Cosine
//! `_distance` lies in [0, 2] with 0 meaning identical, so similarity is
//! `clamp(1 - d/2, 0, 1)`.

use anyhow::Result;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection};
use std::path::Path;
use tracing::{debug, info};

use ragdb_core::error::{Error, Result as CoreResult};
use ragdb_core::traits::{Embedder, Retriever};
use ragdb_core::types::{CandidateFragment, Meta};
use ragdb_embed::get_default_embedder;

pub struct LanceRepository {
    db: Connection,
    table_name: String,
    embedder: Box<dyn Embedder>,
    /// Hard ceiling on fragments fetched per query.
    max_k: usize,
}

impl LanceRepository {
    pub async fn new(db_path: &Path, table_name: &str, max_k: usize) -> Result<Self> {
        let embedder = get_default_embedder()?;
        let db = connect(db_path.to_string_lossy().as_ref()).execute().await?;
        Ok(Self { db, table_name: table_name.to_string(), embedder, max_k })
    }

    /// Number of rows in the fragments table; errors when the store is
    /// unreachable or the table is missing.
    pub async fn healthcheck(&self) -> Result<usize> {
        let table = self.db.open_table(&self.table_name).execute().await?;
        let count = table.count_rows(None).await?;
        debug!(count, table = %self.table_name, "store heartbeat");
        Ok(count)
    }

    pub async fn search(&self, query: &str, n_results: usize) -> Result<Vec<CandidateFragment>> {
        let n_results = n_results.clamp(1, self.max_k);
        debug!(n_results, "running similarity search");

        let query_vec = self
            .embedder
            .embed_batch(&[query.to_string()])?
            .remove(0);
        let table = self.db.open_table(&self.table_name).execute().await?;
        let mut stream = table
            .vector_search(query_vec)?
            .limit(n_results)
            .execute()
            .await?;

        let mut candidates = Vec::new();
        while let Some(batch) = TryStreamExt::try_next(&mut stream).await? {
            for i in 0..batch.num_rows() {
                let id = string_value(&batch, "id", i)?;
                let source = string_value(&batch, "source", i)?;
                let doc_id = string_value(&batch, "doc_id", i)?;
                let chunk_index = int_value(&batch, "chunk_index", i)?;
                let text = string_value(&batch, "content", i)?;
                let score = match float_column(&batch, "_distance", i) {
                    Some(d) => (1.0 - d / 2.0).clamp(0.0, 1.0),
                    None => 0.5,
                };

                let mut metadata = Meta::new();
                metadata.insert("source".to_string(), source);
                metadata.insert("doc_id".to_string(), doc_id);
                metadata.insert("chunk_index".to_string(), chunk_index.to_string());
                candidates.push(CandidateFragment { id, text, score, metadata });
            }
        }

        info!(count = candidates.len(), "similarity search returned candidates");
        Ok(candidates)
    }
}

impl Retriever for LanceRepository {
    fn similarity_search(&self, query: &str, n_results: usize) -> CoreResult<Vec<CandidateFragment>> {
        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        rt.block_on(self.search(query, n_results))
            .map_err(|e| Error::StoreUnavailable(e.to_string()))
    }
}

fn string_value(batch: &arrow_array::RecordBatch, name: &str, row: usize) -> Result<String> {
    let col = batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<arrow_array::StringArray>())
        .ok_or_else(|| anyhow::anyhow!("column '{}' missing or not utf8", name))?;
    Ok(col.value(row).to_string())
}

fn int_value(batch: &arrow_array::RecordBatch, name: &str, row: usize) -> Result<i32> {
    let col = batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<arrow_array::Int32Array>())
        .ok_or_else(|| anyhow::anyhow!("column '{}' missing or not int32", name))?;
    Ok(col.value(row))
}

fn float_column(batch: &arrow_array::RecordBatch, name: &str, row: usize) -> Option<f32> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<arrow_array::Float32Array>())
        .map(|c| c.value(row))
}

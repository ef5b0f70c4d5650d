//! Batch writer that embeds document chunks and appends them to the
//! fragments table.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use lancedb::{connect, Connection};
use std::path::Path;
use std::sync::Arc;

use arrow_array::{FixedSizeListArray, Int32Array, RecordBatch, RecordBatchIterator, StringArray};

use ragdb_core::traits::Embedder;
use ragdb_core::types::DocumentChunk;
use ragdb_embed::get_default_embedder;

use crate::schema::{build_arrow_schema, EMBEDDING_DIM};

#[derive(Debug, Clone)]
struct LanceDocument {
    id: String,
    doc_id: String,
    doc_path: String,
    source: String,
    content: String,
    chunk_index: usize,
    total_chunks: usize,
    vector: Vec<f32>,
}

pub struct LanceIndexer {
    pub(crate) db: Connection,
    pub(crate) table_name: String,
    embedder: Box<dyn Embedder>,
}

impl LanceIndexer {
    pub async fn new(db_path: &Path, table_name: &str) -> Result<Self> {
        let embedder = get_default_embedder()?;
        let db = connect(db_path.to_string_lossy().as_ref()).execute().await?;
        Ok(Self { db, table_name: table_name.to_string(), embedder })
    }

    /// Embed and write chunks in batches of 1000.
    pub async fn index_chunks(&self, chunks: &[DocumentChunk]) -> Result<()> {
        if chunks.is_empty() {
            println!("No chunks to index");
            return Ok(());
        }
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;
        self.index(chunks, &embeddings).await
    }

    pub async fn index(&self, chunks: &[DocumentChunk], embeddings: &[Vec<f32>]) -> Result<()> {
        if chunks.is_empty() {
            println!("No chunks to index");
            return Ok(());
        }
        assert_eq!(chunks.len(), embeddings.len(), "chunks and embeddings length must match");
        println!("Indexing {} chunks into LanceDB table: {}", chunks.len(), self.table_name);
        let pb = ProgressBar::new(chunks.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        let mut processed = 0usize;
        let mut batch_docs = Vec::new();
        let batch_size = 1000usize;
        for (i, (chunk, embedding)) in chunks.iter().zip(embeddings.iter()).enumerate() {
            let doc = LanceDocument {
                id: chunk.id.clone(),
                doc_id: chunk.doc_id.clone(),
                doc_path: chunk.doc_path.clone(),
                source: chunk.source.clone(),
                content: chunk.content.clone(),
                chunk_index: chunk.chunk_index,
                total_chunks: chunk.total_chunks,
                vector: embedding.clone(),
            };
            batch_docs.push(doc);
            processed += 1;
            pb.set_position(processed as u64);
            if batch_docs.len() >= batch_size || i == chunks.len() - 1 {
                self.insert_batch(&batch_docs).await?;
                batch_docs.clear();
            }
        }
        pb.finish_with_message("LanceDB indexing completed");
        println!("Successfully indexed {} chunks into LanceDB", processed);
        Ok(())
    }

    async fn insert_batch(&self, docs: &[LanceDocument]) -> Result<()> {
        if docs.is_empty() {
            return Ok(());
        }
        let record_batch = docs_to_record_batch(docs)?;
        let schema = record_batch.schema();
        let reader = Box::new(RecordBatchIterator::new(vec![Ok(record_batch)].into_iter(), schema));
        if self.db.table_names().execute().await?.contains(&self.table_name) {
            self.db.open_table(&self.table_name).execute().await?.add(reader).execute().await?;
        } else {
            self.db.create_table(&self.table_name, reader).execute().await?;
        }
        Ok(())
    }
}

fn docs_to_record_batch(docs: &[LanceDocument]) -> Result<RecordBatch> {
    let schema = build_arrow_schema();
    let mut ids = Vec::new();
    let mut doc_ids = Vec::new();
    let mut doc_paths = Vec::new();
    let mut sources = Vec::new();
    let mut contents = Vec::new();
    let mut chunk_indices = Vec::new();
    let mut total_chunks = Vec::new();
    let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::new();
    for doc in docs {
        ids.push(doc.id.clone());
        doc_ids.push(doc.doc_id.clone());
        doc_paths.push(doc.doc_path.clone());
        sources.push(doc.source.clone());
        contents.push(doc.content.clone());
        chunk_indices.push(doc.chunk_index as i32);
        total_chunks.push(doc.total_chunks as i32);
        vectors.push(Some(doc.vector.iter().map(|&x| Some(x)).collect()));
    }
    let record_batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(StringArray::from(doc_ids)),
            Arc::new(StringArray::from(doc_paths)),
            Arc::new(StringArray::from(sources)),
            Arc::new(StringArray::from(contents)),
            Arc::new(Int32Array::from(chunk_indices)),
            Arc::new(Int32Array::from(total_chunks)),
            Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(
                vectors.into_iter(),
                EMBEDDING_DIM,
            )),
        ],
    )?;
    Ok(record_batch)
}

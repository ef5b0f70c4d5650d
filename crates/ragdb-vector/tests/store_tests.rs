use std::path::Path;

use ragdb_core::types::DocumentChunk;
use ragdb_vector::{LanceIndexer, LanceRepository};

fn chunk(doc_id: &str, idx: usize, content: &str) -> DocumentChunk {
    DocumentChunk {
        id: format!("{}:{}", doc_id, idx),
        doc_id: doc_id.to_string(),
        doc_path: format!("/tmp/{}.txt", doc_id),
        source: format!("{}.txt", doc_id),
        content: content.to_string(),
        chunk_index: idx,
        total_chunks: 1,
    }
}

async fn seed(db_path: &Path, table: &str) -> anyhow::Result<()> {
    let chunks = vec![
        chunk("water", 0, "rainwater harvesting and storage in food grade barrels"),
        chunk("solar", 0, "sizing a solar panel array for an off grid cabin"),
        chunk("pantry", 0, "rotating canned goods in the root cellar pantry"),
    ];
    let indexer = LanceIndexer::new(db_path, table).await?;
    indexer.index_chunks(&chunks).await?;
    Ok(())
}

#[tokio::test]
async fn seed_then_search_round_trip() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    seed(tmp.path(), "fragments").await?;

    let repo = LanceRepository::new(tmp.path(), "fragments", 12).await?;
    assert_eq!(repo.healthcheck().await?, 3);

    let candidates = repo.search("rainwater storage barrels", 5).await?;
    assert!(!candidates.is_empty());
    for c in &candidates {
        assert!((0.0..=1.0).contains(&c.score), "score {} not normalized", c.score);
        assert!(c.metadata.contains_key("source"));
        assert!(c.metadata.contains_key("doc_id"));
    }
    assert_eq!(candidates[0].id, "water:0", "closest fragment should match the query topic");
    Ok(())
}

#[tokio::test]
async fn n_results_is_clamped_to_max_k() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    seed(tmp.path(), "fragments").await?;

    let repo = LanceRepository::new(tmp.path(), "fragments", 2).await?;
    let candidates = repo.search("pantry", 50).await?;
    assert!(candidates.len() <= 2);

    // Zero requests are raised to one rather than erroring.
    let one = repo.search("pantry", 0).await?;
    assert!(one.len() <= 1);
    Ok(())
}

#[tokio::test]
async fn missing_table_fails_healthcheck() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let repo = LanceRepository::new(tmp.path(), "nope", 12).await?;
    assert!(repo.healthcheck().await.is_err());
    Ok(())
}

#[tokio::test]
async fn ensure_fragments_table_creates_an_empty_table() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let uri = tmp.path().to_string_lossy().to_string();
    let conn = ragdb_vector::table::open_db(&uri).await?;
    ragdb_vector::table::ensure_fragments_table(&conn, "fragments").await?;
    // Idempotent on the second call.
    ragdb_vector::table::ensure_fragments_table(&conn, "fragments").await?;

    let repo = LanceRepository::new(tmp.path(), "fragments", 12).await?;
    assert_eq!(repo.healthcheck().await?, 0);
    Ok(())
}

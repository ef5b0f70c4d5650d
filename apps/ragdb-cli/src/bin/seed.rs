use std::env;
use std::path::PathBuf;

use ragdb_core::chunker::CorpusChunker;
use ragdb_core::config::{expand_path, Config};
use ragdb_vector::LanceIndexer;

fn init_logging(config: &Config) {
    let level: String = config.get("log.level").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    init_logging(&config);

    let args: Vec<String> = env::args().skip(1).collect();
    let corpus_dir = args.first().map(PathBuf::from).unwrap_or_else(|| {
        let dir: String = config
            .get("data.corpus_dir")
            .unwrap_or_else(|_| "./dev_data/corpus".to_string());
        expand_path(dir)
    });
    let lancedb_dir = expand_path(
        config
            .get::<String>("data.lancedb_dir")
            .unwrap_or_else(|_| "./dev_data/indexes/lancedb".to_string()),
    );
    let table: String = config
        .get("data.table")
        .unwrap_or_else(|_| "fragments".to_string());

    println!("Seeding corpus from {}", corpus_dir.display());
    let chunker = CorpusChunker::new();
    let chunks = chunker.process_directory(&corpus_dir)?;
    if chunks.is_empty() {
        println!("Nothing to seed.");
        return Ok(());
    }

    let indexer = LanceIndexer::new(&lancedb_dir, &table).await?;
    indexer.index_chunks(&chunks).await?;
    println!("Seed complete ({} chunks)", chunks.len());
    Ok(())
}

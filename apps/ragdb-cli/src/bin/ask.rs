use std::env;

use ragdb_core::config::{expand_path, Config};
use ragdb_core::types::QueryRequest;
use ragdb_pipeline::RagService;
use ragdb_vector::LanceRepository;

fn init_logging(config: &Config) {
    let level: String = config.get("log.level").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn parse_args() -> (String, Option<usize>, bool) {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} \"<question>\" [--sources N] [--json]", args[0]);
        eprintln!("Example: {} 'How do I store rainwater?' --sources 5", args[0]);
        std::process::exit(1);
    }
    let question = args[1].clone();
    let mut max_sources = None;
    let mut json = false;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--sources" => {
                let Some(n) = args.get(i + 1).and_then(|v| v.parse::<usize>().ok()) else {
                    eprintln!("Error: --sources requires a number");
                    std::process::exit(1);
                };
                max_sources = Some(n);
                i += 1;
            }
            "--json" => json = true,
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
        i += 1;
    }
    (question, max_sources, json)
}

fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    init_logging(&config);
    let (question, max_sources, json) = parse_args();

    let lancedb_dir = expand_path(
        config
            .get::<String>("data.lancedb_dir")
            .unwrap_or_else(|_| "./dev_data/indexes/lancedb".to_string()),
    );
    let table: String = config
        .get("data.table")
        .unwrap_or_else(|_| "fragments".to_string());
    let retrieval = config.retrieval()?;

    let repository = tokio::runtime::Runtime::new()?
        .block_on(async { LanceRepository::new(&lancedb_dir, &table, retrieval.max_k).await })?;
    let service = RagService::new(repository, retrieval);

    let response = service.answer_question(&QueryRequest { question, max_sources })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("{}", response.answer);
    if !response.sources.is_empty() {
        println!();
        println!("Cited fragments:");
        for s in &response.sources {
            println!(
                "  [{}] score={:.4}  id={}  source={}",
                s.citation_id,
                s.score,
                s.id,
                s.source.as_deref().unwrap_or("-")
            );
        }
    }
    Ok(())
}

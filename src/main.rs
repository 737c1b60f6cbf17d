use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use reviewvault::cli::{self, output, Commands};
use reviewvault::connector::{
    Container, ContainerConfig, DEFAULT_EXTRACTION_MODEL, DEFAULT_OPENAI_BASE_URL,
};
use reviewvault::domain::{CollectionStatus, DEFAULT_COLLECTION_NAME, DEFAULT_EMBEDDING_MODEL};

#[derive(Parser)]
#[command(name = "reviewvault")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    #[arg(long, global = true, env = "OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_BASE_URL)]
    openai_base_url: String,

    #[arg(long, global = true, env = "OPENAI_EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL)]
    embedding_model: String,

    #[arg(long, global = true, env = "OPENAI_EXTRACTION_MODEL", default_value = DEFAULT_EXTRACTION_MODEL)]
    extraction_model: String,

    #[arg(long, global = true, env = "QDRANT_URL")]
    qdrant_url: Option<String>,

    #[arg(long, global = true, env = "QDRANT_API_KEY", hide_env_values = true)]
    qdrant_api_key: Option<String>,

    #[arg(long, global = true, env = "REVIEWVAULT_COLLECTION", default_value = DEFAULT_COLLECTION_NAME)]
    collection: String,

    #[arg(long, global = true)]
    mock_embeddings: bool,

    #[arg(long, global = true)]
    memory_storage: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if cli.memory_storage && !cli.command.supports_memory_storage() {
        bail!("--memory-storage only applies to ingest; other commands would see an empty store");
    }

    let container = Container::new(ContainerConfig {
        openai_api_key: cli.openai_api_key,
        openai_base_url: cli.openai_base_url,
        embedding_model: cli.embedding_model,
        extraction_model: cli.extraction_model,
        qdrant_url: cli.qdrant_url,
        qdrant_api_key: cli.qdrant_api_key,
        collection: cli.collection,
        mock_embeddings: cli.mock_embeddings,
        memory_storage: cli.memory_storage,
    })?;

    match cli.command {
        Commands::Ingest {
            urls,
            urls_file,
            delay_secs,
        } => {
            let urls = cli::resolve_urls(urls, urls_file.as_deref().map(Path::new))?;
            output::welcome(urls.len());

            let use_case = container
                .ingest_use_case()?
                .with_request_delay(Duration::from_secs(delay_secs))
                .with_observer(Arc::new(output::ConsoleProgress::new(urls.len())));
            let report = use_case.execute(&urls).await?;

            output::recap(&report);
        }

        Commands::Search { query, limit } => {
            let use_case = container.search_use_case();
            let results = use_case.execute(&query, limit).await?;
            output::search_results(&results);
        }

        Commands::Init => {
            let status = container.vector_repo().ensure_collection().await?;
            match status {
                CollectionStatus::Created => {
                    println!("Created collection: {}", container.collection())
                }
                CollectionStatus::Existing => {
                    println!("Collection {} already exists", container.collection())
                }
            }
        }

        Commands::Stats => {
            let repo = container.vector_repo();
            repo.ensure_collection().await?;
            let count = repo.count().await?;
            info!("Collection {} holds {} points", container.collection(), count);

            println!("ReviewVault Statistics");
            println!("======================");
            println!("Collection: {}", container.collection());
            println!("Store:      {}", container.qdrant_url().unwrap_or("qdrant"));
            println!("Reviews:    {}", count);
            println!(
                "Vectors:    {} dims, {}",
                repo.config().vector_size(),
                repo.config().distance()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn ingest_accepts_repeated_urls() {
        let cli = Cli::try_parse_from([
            "reviewvault",
            "--memory-storage",
            "ingest",
            "--url",
            "https://a.test/1",
            "--url",
            "https://a.test/2",
        ])
        .expect("parse");

        match cli.command {
            Commands::Ingest { urls, delay_secs, .. } => {
                assert_eq!(urls.len(), 2);
                assert_eq!(delay_secs, 2);
            }
            _ => panic!("expected ingest"),
        }
    }

    #[test]
    fn search_limit_defaults_to_five() {
        let cli = Cli::try_parse_from(["reviewvault", "search", "ambient synths"]).expect("parse");
        match cli.command {
            Commands::Search { limit, .. } => assert_eq!(limit, 5),
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn memory_storage_is_refused_outside_ingest() {
        let cli = Cli::try_parse_from(["reviewvault", "--memory-storage", "stats"]).expect("parse");
        assert!(cli.memory_storage);
        assert!(!cli.command.supports_memory_storage());
    }
}

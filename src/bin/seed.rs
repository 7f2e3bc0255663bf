//! Seeds the knowledge base with the running-coach catalog.
//!
//! Usage:
//!   seed              # embed every item and insert it into Supabase
//!   seed --dry-run    # embed every item but keep the rows in memory
//!
//! Running it twice inserts everything twice; clean the table by hand first
//! if that is not what you want.

use clap::Parser;
use std::sync::Arc;
use turf_coach::config::SeedConfig;
use turf_coach::core::knowledge::{running_knowledge, KnowledgeSeeder};
use turf_coach::core::rag::VectorStore;
use turf_coach::infra::ai::GeminiClient;
use turf_coach::infra::vector::{InMemoryVectorStore, SupabaseVectorStore};

#[derive(Parser)]
#[command(name = "seed", version, about = "Load the Turf knowledge catalog into the vector store")]
struct Cli {
    /// Embed the catalog without writing to Supabase
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match SeedConfig::from_env(cli.dry_run) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}. Set it in the environment or in a .env file.", e);
            std::process::exit(1);
        }
    };

    let embedder = GeminiClient::with_model(config.embedding.api_key, config.embedding.model);

    let store: Arc<dyn VectorStore> = match config.store {
        Some(store) => Arc::new(
            SupabaseVectorStore::new(store.url, store.key)
                .with_names(store.table, store.match_function),
        ),
        None => {
            tracing::info!("Dry run: records will be kept in memory only");
            Arc::new(InMemoryVectorStore::new())
        }
    };

    let seeder = KnowledgeSeeder::new(embedder, store)
        .with_embedding_dimensions(config.embedding.dimensions);

    let catalog = running_knowledge();
    tracing::info!("Seeding {} knowledge items...", catalog.len());

    let report = seeder.run(catalog).await;

    tracing::info!(
        attempted = report.attempted(),
        inserted = report.inserted.len(),
        failed = report.failed.len(),
        "Seeding finished"
    );

    if report.is_total_failure() {
        tracing::error!("No item could be seeded");
        std::process::exit(1);
    }
}

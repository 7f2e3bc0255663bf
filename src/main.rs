// This is the entry point of the chat server.
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize the provider clients (dependency injection)
// 3. Serve the HTTP API

use std::sync::Arc;
use turf_coach::config::AppConfig;
use turf_coach::core::rag::{CompletionProvider, EmbeddingProvider, RagService, VectorStore};
use turf_coach::http::{self, AppState};
use turf_coach::infra::ai::{GeminiClient, OpenAiCompatibleClient};
use turf_coach::infra::vector::SupabaseVectorStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists), before the
    // subscriber so RUST_LOG can live there too
    dotenv::dotenv().ok();

    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}. Set it in the environment or in a .env file.", e);
            std::process::exit(1);
        }
    };

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Each client is created once here and shared by every request.

    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(GeminiClient::with_model(
        config.embedding.api_key.clone(),
        config.embedding.model.clone(),
    ));

    let store: Arc<dyn VectorStore> = Arc::new(
        SupabaseVectorStore::new(config.store.url.clone(), config.store.key.clone())
            .with_names(config.store.table.clone(), config.store.match_function.clone()),
    );

    let completer: Arc<dyn CompletionProvider> = Arc::new(OpenAiCompatibleClient::with_base_url(
        config.completion_api_key.clone(),
        config.completion_base_url.clone(),
    ));

    let rag = RagService::new(
        embedder,
        store,
        completer,
        config.retrieval,
        config.completion.clone(),
    )
    .with_embedding_dimensions(config.embedding.dimensions);

    let retrieval = rag.retrieval_config();
    tracing::info!(
        model = %config.completion.model,
        match_threshold = retrieval.match_threshold,
        match_count = retrieval.match_count,
        "RAG service ready"
    );

    let state = Arc::new(AppState { rag });
    http::serve(state, &config.bind_addr).await
}

// ============================================================================
// KNOWLEDGE SEEDER
// ============================================================================
// Walks the catalog once, embeds each item and appends it to the store.
// Failures are per item: a bad item is reported and the run moves on.
// Running it twice stores everything twice; there is no dedup.

use super::catalog::KNOWLEDGE_SOURCE;
use crate::core::rag::models::{KnowledgeItem, KnowledgeRecord, RecordMetadata};
use crate::core::rag::providers::{
    ensure_dimensions, EmbeddingError, EmbeddingProvider, VectorStore, VectorStoreError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Item has no content")]
    EmptyContent,

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Store(#[from] VectorStoreError),
}

/// Outcome of one seeding run.
#[derive(Debug, Default)]
pub struct SeedReport {
    /// Topics that were written, in catalog order.
    pub inserted: Vec<String>,
    /// Topics that failed, with the reason.
    pub failed: Vec<(String, String)>,
}

impl SeedReport {
    pub fn attempted(&self) -> usize {
        self.inserted.len() + self.failed.len()
    }

    pub fn is_total_failure(&self) -> bool {
        self.inserted.is_empty() && !self.failed.is_empty()
    }
}

pub struct KnowledgeSeeder<E, S> {
    embedder: E,
    store: S,
    source: String,
    embedding_dimensions: Option<usize>,
}

impl<E: EmbeddingProvider, S: VectorStore> KnowledgeSeeder<E, S> {
    pub fn new(embedder: E, store: S) -> Self {
        Self {
            embedder,
            store,
            source: KNOWLEDGE_SOURCE.to_string(),
            embedding_dimensions: None,
        }
    }

    /// Rejects item embeddings whose length differs from `dimensions`.
    pub fn with_embedding_dimensions(mut self, dimensions: usize) -> Self {
        self.embedding_dimensions = Some(dimensions);
        self
    }

    /// Seeds every item in order and reports what happened to each one.
    pub async fn run(&self, items: &[KnowledgeItem]) -> SeedReport {
        let mut report = SeedReport::default();

        for item in items {
            match self.seed_item(item).await {
                Ok(()) => {
                    tracing::info!(topic = item.topic, "Inserted knowledge item");
                    report.inserted.push(item.topic.to_string());
                }
                Err(e) => {
                    tracing::error!(topic = item.topic, "Failed to insert knowledge item: {}", e);
                    report.failed.push((item.topic.to_string(), e.to_string()));
                }
            }
        }

        report
    }

    async fn seed_item(&self, item: &KnowledgeItem) -> Result<(), SeedError> {
        if item.content.trim().is_empty() {
            return Err(SeedError::EmptyContent);
        }

        let embedding = self.embedder.embed(item.content).await?;
        ensure_dimensions(&embedding, self.embedding_dimensions)?;

        let record = KnowledgeRecord {
            content: item.content.to_string(),
            metadata: RecordMetadata {
                topic: item.topic.to_string(),
                source: Some(self.source.clone()),
            },
            embedding,
        };

        self.store.insert(&record).await?;
        Ok(())
    }
}

// ============================================================================
// RAG SERVICE
// ============================================================================
// Answers one question per call:
//
//   Parse -> Embed -> Retrieve -> Compose -> Complete -> Respond
//
// Every stage is a function from the previous stage's output to a `Result`,
// and `?` short-circuits to the error path. There are no retries; a failed
// stage fails the whole request.

use super::models::{CompletionConfig, MatchResult, RagAnswer, RetrievalConfig};
use super::prompt::{build_messages, compose_context};
use super::providers::{
    ensure_dimensions, CompletionError, CompletionProvider, EmbeddingError, EmbeddingProvider,
    VectorStore, VectorStoreError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RagError {
    /// The request carried no usable question.
    #[error("Missing message")]
    MissingMessage,

    #[error("Failed to embed question: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Memory failure: {0}")]
    Retrieval(#[from] VectorStoreError),

    #[error("Internal agent error: {0}")]
    Completion(#[from] CompletionError),
}

impl RagError {
    /// True when the caller sent a bad request, false for provider failures.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RagError::MissingMessage)
    }
}

pub struct RagService<E, S, C> {
    embedder: E,
    store: S,
    completer: C,
    retrieval: RetrievalConfig,
    completion: CompletionConfig,
    embedding_dimensions: Option<usize>,
}

impl<E, S, C> RagService<E, S, C>
where
    E: EmbeddingProvider,
    S: VectorStore,
    C: CompletionProvider,
{
    pub fn new(
        embedder: E,
        store: S,
        completer: C,
        retrieval: RetrievalConfig,
        completion: CompletionConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            completer,
            retrieval,
            completion,
            embedding_dimensions: None,
        }
    }

    /// Rejects query embeddings whose length differs from `dimensions`.
    pub fn with_embedding_dimensions(mut self, dimensions: usize) -> Self {
        self.embedding_dimensions = Some(dimensions);
        self
    }

    pub fn retrieval_config(&self) -> &RetrievalConfig {
        &self.retrieval
    }

    /// Runs the full pipeline for one incoming message.
    pub async fn answer(&self, message: Option<&str>) -> Result<RagAnswer, RagError> {
        let question = parse_message(message)?;
        let query_embedding = self.embed_question(question).await?;
        let matches = self.retrieve(&query_embedding).await?;
        let context = compose_context(&matches);

        tracing::debug!(context_chars = context.len(), "Composed grounding context");

        let response = self.complete(&context, question).await?;

        Ok(RagAnswer {
            response,
            sources: matches.into_iter().map(|m| m.metadata.topic).collect(),
        })
    }

    async fn embed_question(&self, question: &str) -> Result<Vec<f32>, RagError> {
        let embedding = self.embedder.embed(question).await?;
        ensure_dimensions(&embedding, self.embedding_dimensions)?;
        tracing::debug!(dimensions = embedding.len(), "Embedded question");
        Ok(embedding)
    }

    async fn retrieve(&self, query_embedding: &[f32]) -> Result<Vec<MatchResult>, RagError> {
        let RetrievalConfig {
            match_threshold,
            match_count,
        } = self.retrieval;

        let mut matches = self
            .store
            .match_records(query_embedding, match_threshold, match_count)
            .await?;

        if matches.len() > match_count {
            tracing::warn!(
                returned = matches.len(),
                match_count,
                "Store returned more matches than requested, truncating"
            );
            matches.truncate(match_count);
        }

        tracing::debug!(matches = matches.len(), "Retrieved matches");
        Ok(matches)
    }

    async fn complete(&self, context: &str, question: &str) -> Result<String, RagError> {
        let messages = build_messages(context, question);
        let response = self.completer.complete(&messages, &self.completion).await?;
        tracing::debug!(response_chars = response.len(), "Received completion");
        Ok(response)
    }
}

/// Extracts the question, rejecting absent, empty or whitespace-only input.
fn parse_message(message: Option<&str>) -> Result<&str, RagError> {
    match message {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(RagError::MissingMessage),
    }
}

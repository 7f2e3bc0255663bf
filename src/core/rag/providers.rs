// ============================================================================
// PROVIDER TRAITS (PORTS)
// ============================================================================
// The core says WHAT it needs from the outside world: something that turns
// text into vectors, somewhere to keep and search those vectors, and a
// language model to write the answer. The infra layer decides HOW.
//
// Each client is built once at startup and shared by every request, so the
// traits take `&self` and require `Send + Sync`.

use super::models::{ChatMessage, CompletionConfig, KnowledgeRecord, MatchResult};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Cannot embed empty text")]
    EmptyInput,

    #[error("Embedding request failed: {0}")]
    Request(String),

    #[error("Embedding API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed embedding response: {0}")]
    MalformedResponse(String),

    #[error("Embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum VectorStoreError {
    /// The insert was rejected or could not be sent.
    #[error("Store write failed: {0}")]
    Write(String),

    /// The similarity search failed.
    #[error("Store query failed: {0}")]
    Query(String),
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion request failed: {0}")]
    Request(String),

    #[error("Completion API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
}

// ============================================================================
// TRAITS
// ============================================================================

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Returns the embedding vector for `text`.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Appends one record. There is no upsert: inserting the same content
    /// twice stores it twice.
    async fn insert(&self, record: &KnowledgeRecord) -> Result<(), VectorStoreError>;

    /// Returns at most `match_count` records whose similarity to
    /// `query_embedding` is above `match_threshold`, most similar first.
    async fn match_records(
        &self,
        query_embedding: &[f32],
        match_threshold: f32,
        match_count: usize,
    ) -> Result<Vec<MatchResult>, VectorStoreError>;
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends the conversation and returns the assistant's reply text.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        config: &CompletionConfig,
    ) -> Result<String, CompletionError>;
}

// Blanket implementations for shared trait objects, so services can be built
// from `Arc<dyn ...>` clients chosen at runtime.

#[async_trait]
impl<T: EmbeddingProvider + ?Sized> EmbeddingProvider for Arc<T> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed(text).await
    }
}

#[async_trait]
impl<T: VectorStore + ?Sized> VectorStore for Arc<T> {
    async fn insert(&self, record: &KnowledgeRecord) -> Result<(), VectorStoreError> {
        (**self).insert(record).await
    }

    async fn match_records(
        &self,
        query_embedding: &[f32],
        match_threshold: f32,
        match_count: usize,
    ) -> Result<Vec<MatchResult>, VectorStoreError> {
        (**self)
            .match_records(query_embedding, match_threshold, match_count)
            .await
    }
}

#[async_trait]
impl<T: CompletionProvider + ?Sized> CompletionProvider for Arc<T> {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        config: &CompletionConfig,
    ) -> Result<String, CompletionError> {
        (**self).complete(messages, config).await
    }
}

/// Checks that an embedding has the dimensionality every stored record uses.
///
/// `None` disables the check.
pub fn ensure_dimensions(
    embedding: &[f32],
    expected: Option<usize>,
) -> Result<(), EmbeddingError> {
    match expected {
        Some(expected) if embedding.len() != expected => Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: embedding.len(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dimensions() {
        assert!(ensure_dimensions(&[0.0; 768], Some(768)).is_ok());
        assert!(ensure_dimensions(&[0.0; 3], None).is_ok());

        match ensure_dimensions(&[0.0; 3], Some(768)) {
            Err(EmbeddingError::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, 768);
                assert_eq!(actual, 3);
            }
            other => panic!("expected dimension mismatch, got {:?}", other),
        }
    }
}

// In-memory implementation of VectorStore.
//
// **When to use it:**
// - Tests that need a real search round-trip without a database
// - Dry runs of the seeder (`seed --dry-run`)
//
// Search is a linear cosine-similarity scan over every record, which is fine
// for a few dozen rows and nothing more.

use crate::core::rag::models::{KnowledgeRecord, MatchResult};
use crate::core::rag::providers::{VectorStore, VectorStoreError};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct InMemoryVectorStore {
    /// Maps insertion id -> record. Ids only grow, so re-seeding appends.
    records: DashMap<u64, KnowledgeRecord>,
    next_id: AtomicU64,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Cosine similarity in [-1, 1]. Mismatched or zero-length vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn insert(&self, record: &KnowledgeRecord) -> Result<(), VectorStoreError> {
        if let Some(existing) = self.records.iter().next() {
            if existing.embedding.len() != record.embedding.len() {
                return Err(VectorStoreError::Write(format!(
                    "expected {} dimensions, got {}",
                    existing.embedding.len(),
                    record.embedding.len()
                )));
            }
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.records.insert(id, record.clone());
        Ok(())
    }

    async fn match_records(
        &self,
        query_embedding: &[f32],
        match_threshold: f32,
        match_count: usize,
    ) -> Result<Vec<MatchResult>, VectorStoreError> {
        let mut scored: Vec<(u64, MatchResult)> = self
            .records
            .iter()
            .map(|entry| {
                let record = entry.value();
                let similarity = cosine_similarity(query_embedding, &record.embedding);
                (
                    *entry.key(),
                    MatchResult {
                        content: record.content.clone(),
                        metadata: record.metadata.clone(),
                        similarity,
                    },
                )
            })
            // Only matches scoring below the threshold are dropped.
            .filter(|(_, m)| m.similarity >= match_threshold)
            .collect();

        // Highest similarity first; ties keep insertion order.
        scored.sort_by(|a, b| {
            b.1.similarity
                .partial_cmp(&a.1.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        Ok(scored
            .into_iter()
            .take(match_count)
            .map(|(_, m)| m)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rag::models::RecordMetadata;

    fn record(topic: &str, embedding: Vec<f32>) -> KnowledgeRecord {
        KnowledgeRecord {
            content: format!("contenido de {}", topic),
            metadata: RecordMetadata {
                topic: topic.to_string(),
                source: None,
            },
            embedding,
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_match_orders_filters_and_limits() {
        let store = InMemoryVectorStore::new();
        store.insert(&record("A", vec![1.0, 0.0])).await.unwrap();
        store.insert(&record("B", vec![0.8, 0.6])).await.unwrap();
        store.insert(&record("C", vec![0.0, 1.0])).await.unwrap();
        store.insert(&record("D", vec![0.6, 0.8])).await.unwrap();

        let matches = store.match_records(&[1.0, 0.0], 0.5, 2).await.unwrap();

        let topics: Vec<&str> = matches.iter().map(|m| m.metadata.topic.as_str()).collect();
        assert_eq!(topics, vec!["A", "B"]);

        let all = store.match_records(&[1.0, 0.0], 0.5, 10).await.unwrap();
        // C is orthogonal and falls below the threshold.
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_match_at_threshold_is_kept() {
        let store = InMemoryVectorStore::new();
        let query = [1.0, 0.0];
        let boundary = record("Borde", vec![0.6, 0.8]);
        let at_threshold = cosine_similarity(&query, &boundary.embedding);
        store.insert(&boundary).await.unwrap();

        let matches = store.match_records(&query, at_threshold, 3).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].similarity, at_threshold);

        let above = store
            .match_records(&query, at_threshold + 0.01, 3)
            .await
            .unwrap();
        assert!(above.is_empty());
    }

    #[tokio::test]
    async fn test_insert_appends_duplicates() {
        let store = InMemoryVectorStore::new();
        let r = record("A", vec![1.0, 0.0]);

        store.insert(&r).await.unwrap();
        store.insert(&r).await.unwrap();

        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_rejects_mixed_dimensions() {
        let store = InMemoryVectorStore::new();
        store.insert(&record("A", vec![1.0, 0.0])).await.unwrap();

        let err = store.insert(&record("B", vec![1.0, 0.0, 0.0])).await;
        assert!(matches!(err, Err(VectorStoreError::Write(_))));
        assert_eq!(store.len(), 1);
    }
}

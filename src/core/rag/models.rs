use serde::{Deserialize, Deserializer, Serialize};

/// A hand-authored piece of coaching knowledge, as it appears in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnowledgeItem {
    pub topic: &'static str,
    pub content: &'static str,
}

/// Metadata stored alongside each record.
///
/// `topic` defaults to an empty string when a stored row has no topic, so a
/// match always contributes exactly one entry to the response sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    #[serde(default)]
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A row persisted by the seeder: content, metadata and its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    pub content: String,
    pub metadata: RecordMetadata,
    pub embedding: Vec<f32>,
}

/// A record returned by the store's similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: RecordMetadata,
    #[serde(default)]
    pub similarity: f32,
}

// jsonb columns come back as `null` rather than being omitted.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One message in a completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Parameters sent with every completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    pub model: String,
    /// Kept low so the answer stays close to the supplied context.
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.1,
            max_tokens: None,
        }
    }
}

/// Similarity-search parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalConfig {
    /// Matches scoring below this are excluded by the store.
    pub match_threshold: f32,
    /// Upper bound on the number of matches used for one answer.
    pub match_count: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.5,
            match_count: 3,
        }
    }
}

/// Final answer produced by `RagService`.
///
/// `sources` holds one topic per match used, in retrieval order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RagAnswer {
    pub response: String,
    pub sources: Vec<String>,
}

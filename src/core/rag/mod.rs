pub mod models;
pub mod prompt;
pub mod providers;
pub mod rag_service;

pub use models::{
    ChatMessage, CompletionConfig, KnowledgeItem, KnowledgeRecord, MatchResult, RagAnswer,
    RecordMetadata, RetrievalConfig,
};
pub use providers::{
    CompletionError, CompletionProvider, EmbeddingError, EmbeddingProvider, VectorStore,
    VectorStoreError,
};
pub use rag_service::{RagError, RagService};

// End-to-end flow: seed the catalog into the in-memory store, then answer a
// question through the RAG service, with deterministic fake providers.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use turf_coach::core::knowledge::{running_knowledge, KnowledgeSeeder};
use turf_coach::core::rag::{
    ChatMessage, CompletionConfig, CompletionError, CompletionProvider, EmbeddingError,
    EmbeddingProvider, RagService, RetrievalConfig,
};
use turf_coach::infra::vector::InMemoryVectorStore;

/// Embeds text as keyword counts over a tiny vocabulary, so similar wording
/// lands close together.
struct KeywordEmbedder {
    fail_on: Option<&'static str>,
    calls: AtomicUsize,
}

const VOCABULARY: &[&str] = &[
    "agua",
    "hora",
    "carrera",
    "rodilla",
    "kilometraje",
    "intervalos",
    "zapatillas",
    "dormir",
    "electrolitos",
];

impl KeywordEmbedder {
    fn new() -> Self {
        Self {
            fail_on: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let lower = text.to_lowercase();
        if let Some(marker) = self.fail_on {
            if lower.contains(marker) {
                return Err(EmbeddingError::Request("network unreachable".to_string()));
            }
        }
        Ok(VOCABULARY
            .iter()
            .map(|word| lower.matches(word).count() as f32)
            .collect())
    }
}

#[derive(Default)]
struct RecordingCompleter {
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

#[async_trait]
impl CompletionProvider for RecordingCompleter {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _config: &CompletionConfig,
    ) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(messages.to_vec());
        Ok("Para 2 horas, además de agua repone electrolitos y carbohidratos.".to_string())
    }
}

#[tokio::test]
async fn hydration_question_is_grounded_in_hydration_item() {
    let embedder = Arc::new(KeywordEmbedder::new());
    let store = Arc::new(InMemoryVectorStore::new());

    let report = KnowledgeSeeder::new(Arc::clone(&embedder), Arc::clone(&store))
        .run(running_knowledge())
        .await;
    assert_eq!(report.inserted.len(), running_knowledge().len());

    let completer = Arc::new(RecordingCompleter::default());
    let service = RagService::new(
        Arc::clone(&embedder),
        Arc::clone(&store),
        Arc::clone(&completer),
        RetrievalConfig::default(),
        CompletionConfig::default(),
    );

    let answer = service
        .answer(Some("¿cuánta agua debo tomar en una carrera de 2 horas?"))
        .await
        .unwrap();

    assert_eq!(answer.sources, vec!["Hidratación"]);
    assert!(answer.response.contains("electrolitos"));

    let prompts = completer.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    let system = &prompts[0][0].content;
    assert!(system.contains("es necesario reponer electrolitos y carbohidratos"));
    assert!(!system.contains("No hay información específica."));
}

#[tokio::test]
async fn unrelated_question_gets_placeholder_context() {
    let embedder = Arc::new(KeywordEmbedder::new());
    let store = Arc::new(InMemoryVectorStore::new());
    KnowledgeSeeder::new(Arc::clone(&embedder), Arc::clone(&store))
        .run(running_knowledge())
        .await;

    let completer = Arc::new(RecordingCompleter::default());
    let service = RagService::new(
        embedder,
        store,
        Arc::clone(&completer),
        RetrievalConfig::default(),
        CompletionConfig::default(),
    );

    let answer = service.answer(Some("¿quién ganó el maratón?")).await.unwrap();

    assert!(answer.sources.is_empty());
    let prompts = completer.prompts.lock().unwrap();
    assert!(prompts[0][0].content.contains("No hay información específica."));
}

#[tokio::test]
async fn reseeding_appends_only_successful_items() {
    let store = Arc::new(InMemoryVectorStore::new());

    let first = KnowledgeSeeder::new(KeywordEmbedder::new(), Arc::clone(&store))
        .run(running_knowledge())
        .await;
    assert_eq!(store.len(), first.inserted.len());

    let flaky = KeywordEmbedder {
        fail_on: Some("zapatillas"),
        calls: AtomicUsize::new(0),
    };
    let second = KnowledgeSeeder::new(flaky, Arc::clone(&store))
        .run(running_knowledge())
        .await;

    assert_eq!(second.failed.len(), 1);
    assert_eq!(second.failed[0].0, "Calzado");
    assert_eq!(store.len(), first.inserted.len() + second.inserted.len());
    assert_eq!(store.len(), 11);
}

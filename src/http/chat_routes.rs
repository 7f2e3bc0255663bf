use crate::core::rag::{
    CompletionProvider, EmbeddingProvider, RagAnswer, RagError, RagService, VectorStore,
};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Body returned for a request without a usable `message`.
pub const MISSING_MESSAGE_ERROR: &str = "Falta el mensaje";

/// Body returned for every provider failure. Details are logged, not sent.
pub const INTERNAL_ERROR: &str = "Error interno del entrenador AI";

/// The RAG service with its clients erased, as stored in router state.
pub type SharedRagService = RagService<
    Arc<dyn EmbeddingProvider>,
    Arc<dyn VectorStore>,
    Arc<dyn CompletionProvider>,
>;

/// Shared state for the router. Built once at startup, read by every request.
pub struct AppState {
    pub rag: SharedRagService,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
    sources: Vec<String>,
}

impl From<RagAnswer> for ChatResponse {
    fn from(answer: RagAnswer) -> Self {
        Self {
            response: answer.response,
            sources: answer.sources,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Run the HTTP server until the process is stopped.
pub async fn serve(state: Arc<AppState>, bind_addr: &str) -> anyhow::Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /chat
///
/// The body is read raw so that an empty or malformed payload is reported as
/// a missing message (400) rather than axum's own rejection.
async fn chat_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let message = parse_message(&body);

    match state.rag.answer(message.as_deref()).await {
        Ok(answer) => (StatusCode::OK, Json(ChatResponse::from(answer))).into_response(),
        Err(err) => error_response(err),
    }
}

/// Reads `message` from a JSON object body. Anything else, including an empty
/// body or a top-level array, yields `None`.
fn parse_message(body: &[u8]) -> Option<String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(value) => value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        Err(e) => {
            tracing::debug!("Rejecting unparseable chat body: {}", e);
            None
        }
    }
}

fn error_response(err: RagError) -> Response {
    let (status, message) = if err.is_client_error() {
        tracing::warn!("Bad chat request: {}", err);
        (StatusCode::BAD_REQUEST, MISSING_MESSAGE_ERROR)
    } else {
        tracing::error!("Chat request failed: {}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
    };

    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

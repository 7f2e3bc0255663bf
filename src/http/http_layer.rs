// HTTP layer - adapts the core RAG service to JSON over HTTP.
// Nothing here knows about embeddings or prompts; it parses requests, calls
// the service and maps results to status codes.

#[path = "chat_routes.rs"]
pub mod chat;

pub use chat::{build_router, serve, AppState, SharedRagService};

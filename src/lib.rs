// Turf running-coach backend: a small retrieval-augmented chat service.
//
// **Architecture Overview:**
// - `core/` = Business logic (RAG pipeline, knowledge seeding, provider traits)
// - `infra/` = Implementations of core traits (Gemini, Groq, Supabase, in-memory)
// - `http/` = axum adapter exposing the chat endpoint
//
// The binaries (`src/main.rs` for the server, `src/bin/seed.rs` for the
// seeder) are the composition roots that wire these together.

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
pub mod core;
#[path = "http/http_layer.rs"]
pub mod http;
#[path = "infra/infra_layer.rs"]
pub mod infra;

pub mod config;

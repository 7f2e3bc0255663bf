pub mod in_memory;
pub mod supabase_store;

pub use in_memory::InMemoryVectorStore;
pub use supabase_store::SupabaseVectorStore;

pub mod catalog;
pub mod seeder;

pub use catalog::{running_knowledge, KNOWLEDGE_SOURCE};
pub use seeder::{KnowledgeSeeder, SeedError, SeedReport};

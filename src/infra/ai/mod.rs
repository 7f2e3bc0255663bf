pub mod gemini_client;
pub mod openai_compatible_client;

pub use gemini_client::GeminiClient;
pub use openai_compatible_client::OpenAiCompatibleClient;

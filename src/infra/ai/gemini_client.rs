// =============================================================================
// GEMINI CLIENT - Google AI Studio Embedding API
// =============================================================================
//
// Implements `EmbeddingProvider` on top of the Gemini `embedContent` endpoint
// (https://ai.google.dev/api/embeddings).
//
// **Notes:**
// - Authentication: API key is passed as a query parameter (`?key=API_KEY`)
//   rather than a Bearer token in the Authorization header.
// - Request format: the text goes in `content.parts[0].text`.
// - Response format: the vector is at `embedding.values`.
//
// **Models:**
// - `text-embedding-004` - 768-dimensional vectors (default)
//
// **Environment Variables:**
// - `GOOGLE_API_KEY` - Your API key from https://aistudio.google.com/apikey

use crate::core::rag::providers::{EmbeddingError, EmbeddingProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// =============================================================================
// GEMINI API DATA STRUCTURES
// =============================================================================

/// A single text part. Gemini wraps all content in a `parts` array.
#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

/// The request body sent to the embedContent endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest {
    /// Fully qualified model name, e.g. `models/text-embedding-004`.
    model: String,
    content: Content,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: Option<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    #[serde(default)]
    values: Vec<f32>,
}

/// Error response from Gemini API.
#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorDetail,
}

// =============================================================================
// GEMINI CLIENT IMPLEMENTATION
// =============================================================================

/// Client for the Gemini embedding API.
///
/// # Example
/// ```ignore
/// let client = GeminiClient::new(std::env::var("GOOGLE_API_KEY")?);
/// let vector = client.embed("¿Qué hago si me duele la rodilla?").await?;
/// ```
pub struct GeminiClient {
    /// HTTP client for making requests.
    client: Client,

    /// API key for authentication.
    api_key: String,

    /// Embedding model name, without the `models/` prefix.
    model: String,

    base_url: String,
}

impl GeminiClient {
    /// Creates a client for the default embedding model.
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_EMBEDDING_MODEL.to_string())
    }

    pub fn with_model(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:embedContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn build_request(&self, text: &str) -> EmbedContentRequest {
        EmbedContentRequest {
            model: format!("models/{}", self.model),
            content: Content {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
        }
    }

    fn parse_error(status: u16, body: &str) -> EmbeddingError {
        let message = serde_json::from_str::<GeminiErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string());
        EmbeddingError::Api { status, message }
    }

    fn extract_values(response: EmbedContentResponse) -> Result<Vec<f32>, EmbeddingError> {
        let values = response
            .embedding
            .map(|e| e.values)
            .ok_or_else(|| EmbeddingError::MalformedResponse("missing `embedding`".to_string()))?;

        if values.is_empty() {
            return Err(EmbeddingError::MalformedResponse(
                "embedding has no values".to_string(),
            ));
        }

        Ok(values)
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        // Log request for debugging (be careful not to log the API key!)
        tracing::debug!("Gemini embed request to model {}: {} chars", self.model, text.len());

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&self.build_request(text))
            .send()
            .await
            .map_err(|e| EmbeddingError::Request(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status, &body));
        }

        let parsed: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::MalformedResponse(e.without_url().to_string()))?;

        Self::extract_values(parsed)
    }
}

// =============================================================================
// TESTS
// =============================================================================

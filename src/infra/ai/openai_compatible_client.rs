use crate::core::rag::{
    models::{ChatMessage, CompletionConfig},
    providers::{CompletionError, CompletionProvider},
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

/// Groq's OpenAI-compatible endpoint.
pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Chat-completions client for any OpenAI-compatible API (Groq by default).
pub struct OpenAiCompatibleClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiCompatibleClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_COMPLETION_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_payload(messages: &[ChatMessage], config: &CompletionConfig) -> Value {
        let mut payload = json!({
            "model": config.model,
            "messages": messages,
            "temperature": config.temperature,
        });
        if let Some(max_tokens) = config.max_tokens {
            payload["max_tokens"] = json!(max_tokens);
        }
        payload
    }

    fn extract_content(response_json: &Value) -> Result<String, CompletionError> {
        response_json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                CompletionError::MalformedResponse("Failed to parse response content".to_string())
            })
    }

    fn extract_error_message(body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| body.to_string())
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatibleClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        config: &CompletionConfig,
    ) -> Result<String, CompletionError> {
        let payload = Self::build_payload(messages, config);

        tracing::debug!(
            "Completion request to model {}: {} messages",
            config.model,
            messages.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status,
                message: Self::extract_error_message(&text),
            });
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        Self::extract_content(&response_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_contains_model_messages_and_temperature() {
        let messages = vec![ChatMessage::system("ctx"), ChatMessage::user("hola")];
        let payload = OpenAiCompatibleClient::build_payload(&messages, &CompletionConfig::default());

        assert_eq!(payload["model"], "llama-3.3-70b-versatile");
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["content"], "hola");
        assert!((payload["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
        assert!(payload.get("max_tokens").is_none());
    }

    #[test]
    fn test_payload_includes_max_tokens_when_set() {
        let config = CompletionConfig {
            max_tokens: Some(256),
            ..Default::default()
        };
        let payload = OpenAiCompatibleClient::build_payload(&[], &config);
        assert_eq!(payload["max_tokens"], 256);
    }

    #[test]
    fn test_extract_content() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "Descansa."}}]});
        assert_eq!(OpenAiCompatibleClient::extract_content(&body).unwrap(), "Descansa.");

        let null_content = json!({"choices": [{"message": {"content": null}}]});
        assert!(OpenAiCompatibleClient::extract_content(&null_content).is_err());
        assert!(OpenAiCompatibleClient::extract_content(&json!({"choices": []})).is_err());
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#;
        assert_eq!(OpenAiCompatibleClient::extract_error_message(body), "Invalid API Key");
        assert_eq!(OpenAiCompatibleClient::extract_error_message("oops"), "oops");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = OpenAiCompatibleClient::with_base_url(
            "k".to_string(),
            "https://openrouter.ai/api/v1/".to_string(),
        );
        assert_eq!(client.endpoint(), "https://openrouter.ai/api/v1/chat/completions");
        assert_eq!(
            OpenAiCompatibleClient::new("k".to_string()).endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }
}

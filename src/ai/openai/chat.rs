use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage};
use crate::ai::GenerationService;
use crate::models::GenerationConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Sends each prompt as a single user message to a chat completions API.
pub struct OpenAiChatClient {
    http: OpenAiHttpClient,
    config: GenerationConfig,
}

impl OpenAiChatClient {
    pub fn new(api_key: String, base_url: String, config: GenerationConfig) -> Self {
        Self::new_with_client(
            api_key,
            base_url,
            config,
            Duration::from_secs(30),
            reqwest::Client::new(),
        )
    }

    pub fn new_with_client(
        api_key: String,
        base_url: String,
        config: GenerationConfig,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, base_url, timeout, client),
            config,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl GenerationService for OpenAiChatClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(prompt.to_string()),
            }],
            temperature: self.config.temperature,
        };

        let response = self.http.chat_completion(request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| Error::AiProvider("No response from chat completion API".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::openai::client::GROQ_BASE_URL;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(
        server: &MockServer,
        api_key: &str,
        config: GenerationConfig,
    ) -> OpenAiChatClient {
        OpenAiChatClient::new(api_key.to_string(), GROQ_BASE_URL.to_string(), config)
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_generate_parses_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": "Learn to sail across the Atlantic"
                    },
                    "finish_reason": "stop"
                }]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key", GenerationConfig::default());

        let text = client.generate("suggest a dream").await.unwrap();
        assert_eq!(text, "Learn to sail across the Atlantic");
    }

    #[tokio::test]
    async fn test_generate_sends_configured_model_and_temperature() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "custom-model",
                "temperature": 0.5,
                "messages": [{ "role": "user", "content": "the prompt" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "ok" },
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = GenerationConfig {
            model: "custom-model".to_string(),
            temperature: 0.5,
        };
        let client = make_client(&server, "key", config);

        client.generate("the prompt").await.unwrap();
    }

    #[tokio::test]
    async fn test_api_error_returns_ai_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = make_client(&server, "key", GenerationConfig::default());

        let err = client.generate("prompt").await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(ref msg) if msg.contains("rate limited")));
    }

    #[tokio::test]
    async fn test_empty_choices_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let client = make_client(&server, "key", GenerationConfig::default());

        let err = client.generate("prompt").await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_empty_content_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "" },
                    "finish_reason": "stop"
                }]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, "key", GenerationConfig::default());

        let err = client.generate("prompt").await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = make_client(&server, "key", GenerationConfig::default());

        let err = client.generate("prompt").await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(ref msg) if msg.contains("parse")));
    }
}

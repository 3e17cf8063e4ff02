use super::client::GeminiHttpClient;
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationSettings, Part,
};
use crate::ai::GenerationService;
use crate::models::GenerationConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

pub struct GeminiChatClient {
    http: GeminiHttpClient,
    temperature: f32,
}

impl GeminiChatClient {
    pub fn new(api_key: String, config: GenerationConfig) -> Self {
        Self::new_with_client(api_key, config, Duration::from_secs(30), reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        config: GenerationConfig,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, config.model, timeout, client),
            temperature: config.temperature,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    fn extract_text(response: GenerateContentResponse) -> Option<String> {
        let text: String = response
            .candidates
            .into_iter()
            .next()?
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect();

        (!text.is_empty()).then_some(text)
    }
}

#[async_trait]
impl GenerationService for GeminiChatClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationSettings {
                temperature: self.temperature,
            },
        };

        tracing::debug!(model = self.http.model(), "Sending prompt to Gemini");
        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        Self::extract_text(response)
            .ok_or_else(|| Error::AiProvider("No text in Gemini response".to_string()))
    }
}

//! AI service integration for text generation
//!
//! Provides a provider-agnostic [`GenerationService`] plus concrete clients
//! for OpenAI-compatible chat completions (Groq, OpenAI) and Gemini.

pub mod gemini;
pub mod mock;
pub mod openai;
pub mod retry;

pub use gemini::GeminiChatClient;
pub use mock::MockGenerationClient;
pub use openai::OpenAiChatClient;
pub use retry::RetryingGenerationClient;

use crate::Result;
use async_trait::async_trait;

/// Turns one fully rendered prompt into generated text.
///
/// Model and temperature are fixed when the client is built, never per call.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

use super::GenerationService;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::{strategy::FixedInterval, Retry};
use tracing::warn;

/// Wraps a [`GenerationService`] with a bounded, fixed-interval retry.
///
/// `max_retries == 0` means exactly one attempt.
pub struct RetryingGenerationClient {
    inner: Arc<dyn GenerationService>,
    max_retries: usize,
    interval: Duration,
}

impl RetryingGenerationClient {
    pub fn new(inner: Arc<dyn GenerationService>, max_retries: usize, interval: Duration) -> Self {
        Self {
            inner,
            max_retries,
            interval,
        }
    }
}

#[async_trait]
impl GenerationService for RetryingGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if self.max_retries == 0 {
            return self.inner.generate(prompt).await;
        }

        let retry_strategy =
            FixedInterval::from_millis(self.interval.as_millis() as u64).take(self.max_retries);

        Retry::spawn(retry_strategy, move || async move {
            match self.inner.generate(prompt).await {
                Ok(text) => Ok(text),
                Err(e) => {
                    warn!("Generation attempt failed: {}. Will retry...", e);
                    Err(e)
                }
            }
        })
        .await
    }
}

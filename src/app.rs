//! Application wiring: build the generation client once, share it with every
//! request, and serve the router.

use crate::ai::{
    openai::{GROQ_BASE_URL, OPENAI_BASE_URL},
    GeminiChatClient, GenerationService, OpenAiChatClient, RetryingGenerationClient,
};
use crate::dreams::DreamService;
use crate::models::{AiProvider, Config};
use crate::routes::{self, AppState};
use crate::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Owns the fully layered router and the address it should listen on.
pub struct App {
    router: Router,
    host: String,
    port: u16,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub generator: Arc<dyn GenerationService>,
}

impl App {
    /// Build an app from concrete service dependencies.
    ///
    /// The retry policy from `config` wraps whatever generator is injected.
    pub fn with_services(services: AppServices, config: &Config) -> Result<Self> {
        let generator: Arc<dyn GenerationService> = if config.max_retries > 0 {
            info!(
                "Generation retries enabled ({} retries, {:?} apart)",
                config.max_retries, config.retry_interval
            );
            Arc::new(RetryingGenerationClient::new(
                services.generator,
                config.max_retries,
                config.retry_interval,
            ))
        } else {
            services.generator
        };

        let state = AppState::new(DreamService::new(generator));
        let router = routes::app(state, &config.allowed_origins)?;

        Ok(Self {
            router,
            host: config.host.clone(),
            port: config.port,
        })
    }

    fn build_generator(config: &Config) -> Arc<dyn GenerationService> {
        let http_client = reqwest::Client::new();
        let base_url = |default: &str| {
            config
                .base_url
                .clone()
                .unwrap_or_else(|| default.to_string())
        };

        info!(
            "Generation provider: {:?} (model: {}, temperature: {}, timeout: {:?})",
            config.provider, config.generation.model, config.generation.temperature, config.timeout
        );

        match config.provider {
            AiProvider::Groq | AiProvider::OpenAi => {
                let default_url = if config.provider == AiProvider::Groq {
                    GROQ_BASE_URL
                } else {
                    OPENAI_BASE_URL
                };
                Arc::new(OpenAiChatClient::new_with_client(
                    config.api_key.clone(),
                    base_url(default_url),
                    config.generation.clone(),
                    config.timeout,
                    http_client,
                )) as Arc<dyn GenerationService>
            }
            AiProvider::Gemini => {
                let client = GeminiChatClient::new_with_client(
                    config.api_key.clone(),
                    config.generation.clone(),
                    config.timeout,
                    http_client,
                );
                match &config.base_url {
                    Some(url) => {
                        Arc::new(client.with_base_url(url.clone())) as Arc<dyn GenerationService>
                    }
                    None => Arc::new(client),
                }
            }
        }
    }

    /// Construct an app from a loaded configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let generator = Self::build_generator(config);
        Self::with_services(AppServices { generator }, config)
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&addr).await?;
        info!("Listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerationConfig;
    use std::time::Duration;

    fn config(provider: AiProvider) -> Config {
        Config {
            provider,
            api_key: "key".to_string(),
            generation: GenerationConfig::default(),
            base_url: None,
            timeout: Duration::from_secs(5),
            max_retries: 0,
            retry_interval: Duration::ZERO,
            allowed_origins: vec!["https://futureself.vercel.app".to_string()],
            host: "127.0.0.1".to_string(),
            port: 0,
        }
    }

    #[test]
    fn test_app_builds_for_every_provider() {
        for provider in [AiProvider::Groq, AiProvider::OpenAi, AiProvider::Gemini] {
            assert!(App::new(&config(provider)).is_ok());
        }
    }

    #[test]
    fn test_invalid_origin_is_config_error() {
        let mut config = config(AiProvider::Groq);
        config.allowed_origins = vec!["https://bad\norigin".to_string()];

        let err = App::new(&config).err().unwrap();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}

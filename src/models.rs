//! Data models and structures
//!
//! Defines the request/response bodies of the HTTP API, the local reading of
//! a validity classification, and the process configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Body accepted by `/dreams` and `/validate_dream`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DreamRequest {
    pub dreams: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DreamResponse {
    pub content: String,
}

impl DreamResponse {
    pub fn new(content: String) -> Self {
        Self { content }
    }
}

/// Failure body shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// How the model's answer to the validity prompt reads locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DreamVerdict {
    Valid,
    Invalid,
    /// Anything other than the two literal tokens.
    Indeterminate,
}

impl DreamVerdict {
    /// Reads a raw classification. Surrounding whitespace and quotes are
    /// ignored; the token itself must match exactly.
    pub fn from_model_output(output: &str) -> Self {
        match output.trim().trim_matches(|c| c == '"' || c == '\'') {
            "valid" => Self::Valid,
            "invalid" => Self::Invalid,
            _ => Self::Indeterminate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    Groq,
    OpenAi,
    Gemini,
}

impl AiProvider {
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl FromStr for AiProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            other => Err(Error::Config(format!(
                "Unknown AI_PROVIDER '{}'. Expected one of: groq, openai, gemini",
                other
            ))),
        }
    }
}

/// Model and sampling settings, fixed for the life of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub model: String,
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "llama3-8b-8192".to_string(),
            temperature: 0.5,
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: AiProvider,
    pub api_key: String,
    pub generation: GenerationConfig,
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub max_retries: usize,
    pub retry_interval: Duration,
    pub allowed_origins: Vec<String>,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any variable source; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match var("AI_PROVIDER") {
            Some(value) => value.parse()?,
            None => AiProvider::Groq,
        };

        let api_key = var(provider.api_key_var()).ok_or_else(|| {
            Error::Config(format!("{} not set", provider.api_key_var()))
        })?;

        let defaults = GenerationConfig::default();
        let generation = GenerationConfig {
            model: var("GENERATION_MODEL").unwrap_or(defaults.model),
            temperature: parse_or(
                "GENERATION_TEMPERATURE",
                var("GENERATION_TEMPERATURE"),
                defaults.temperature,
            )?,
        };

        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["https://futureself.vercel.app".to_string()]);

        let timeout_secs: u64 = parse_or(
            "GENERATION_TIMEOUT_SECS",
            var("GENERATION_TIMEOUT_SECS"),
            30,
        )?;
        if timeout_secs == 0 {
            return Err(Error::Config(
                "Invalid value for GENERATION_TIMEOUT_SECS: must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            provider,
            api_key,
            generation,
            base_url: var("GENERATION_BASE_URL"),
            timeout: Duration::from_secs(timeout_secs),
            max_retries: parse_or("GENERATION_MAX_RETRIES", var("GENERATION_MAX_RETRIES"), 0)?,
            retry_interval: Duration::from_millis(parse_or(
                "GENERATION_RETRY_INTERVAL_MS",
                var("GENERATION_RETRY_INTERVAL_MS"),
                500,
            )?),
            allowed_origins,
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or("PORT", var("PORT"), 8001)?,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("Invalid value for {}: '{}'", key, raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_dream_request_deserialization() {
        let request: DreamRequest =
            serde_json::from_str(r#"{"dreams": "Open a bakery"}"#).unwrap();
        assert_eq!(request.dreams, "Open a bakery");
    }

    #[test]
    fn test_error_response_serialization() {
        let body = ErrorResponse {
            detail: "boom".to_string(),
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"detail":"boom"}"#);
    }

    #[test]
    fn test_verdict_reads_exact_tokens() {
        assert_eq!(DreamVerdict::from_model_output("valid"), DreamVerdict::Valid);
        assert_eq!(DreamVerdict::from_model_output("invalid"), DreamVerdict::Invalid);
        assert_eq!(DreamVerdict::from_model_output(" \"valid\"\n"), DreamVerdict::Valid);
    }

    #[test]
    fn test_verdict_flags_anything_else() {
        assert_eq!(DreamVerdict::from_model_output("Valid"), DreamVerdict::Indeterminate);
        assert_eq!(
            DreamVerdict::from_model_output("The dream is valid."),
            DreamVerdict::Indeterminate
        );
        assert_eq!(DreamVerdict::from_model_output(""), DreamVerdict::Indeterminate);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup(&[("GROQ_API_KEY", "gsk-test")])).unwrap();

        assert_eq!(config.provider, AiProvider::Groq);
        assert_eq!(config.api_key, "gsk-test");
        assert_eq!(config.generation, GenerationConfig::default());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.allowed_origins, vec!["https://futureself.vercel.app"]);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8001);
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_config_missing_key_is_error() {
        let err = Config::from_lookup(lookup(&[("AI_PROVIDER", "gemini")])).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("GEMINI_API_KEY")));
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("AI_PROVIDER", "OpenAI"),
            ("OPENAI_API_KEY", "sk-test"),
            ("GENERATION_MODEL", "gpt-4o-mini"),
            ("GENERATION_TEMPERATURE", "0.9"),
            ("GENERATION_MAX_RETRIES", "1"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("PORT", "9000"),
        ]))
        .unwrap();

        assert_eq!(config.provider, AiProvider::OpenAi);
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.generation.temperature, 0.9);
        assert_eq!(config.max_retries, 1);
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_config_rejects_bad_numbers() {
        let err = Config::from_lookup(lookup(&[
            ("GROQ_API_KEY", "gsk-test"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("PORT")));
    }

    #[test]
    fn test_config_rejects_zero_timeout() {
        let err = Config::from_lookup(lookup(&[
            ("GROQ_API_KEY", "gsk-test"),
            ("GENERATION_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("GENERATION_TIMEOUT_SECS")));
    }

    #[test]
    fn test_unknown_provider() {
        assert!("claude".parse::<AiProvider>().is_err());
    }
}

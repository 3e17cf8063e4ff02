//! The three dream operations: each renders one fixed template and makes a
//! single call to the generation service.

use crate::ai::GenerationService;
use crate::models::DreamVerdict;
use crate::prompts::{self, PromptTemplate};
use crate::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Binds the fixed templates to a shared generation client.
///
/// Holds no per-request state; one instance serves every request.
#[derive(Clone)]
pub struct DreamService {
    generator: Arc<dyn GenerationService>,
}

impl DreamService {
    pub fn new(generator: Arc<dyn GenerationService>) -> Self {
        Self { generator }
    }

    /// A letter from the self who already lived these dreams.
    pub async fn generate_letter(&self, dreams: &str) -> Result<String> {
        self.run(&prompts::REFLECTIVE_LETTER, &[("dreams", dreams)])
            .await
    }

    /// One short, achievable aspiration. Repeated calls may differ.
    pub async fn random_dream(&self) -> Result<String> {
        self.run(&prompts::RANDOM_DREAM, &[]).await
    }

    /// Returns the model's classification verbatim.
    ///
    /// The text should be `valid` or `invalid`; anything else is logged and
    /// still passed through.
    pub async fn validate_dream(&self, dreams: &str) -> Result<String> {
        let content = self
            .run(&prompts::DREAM_VALIDITY, &[("dream", dreams)])
            .await?;

        match DreamVerdict::from_model_output(&content) {
            DreamVerdict::Indeterminate => {
                warn!(output = %content, "Classification was neither 'valid' nor 'invalid'");
            }
            verdict => debug!(?verdict, "Dream classified"),
        }

        Ok(content)
    }

    async fn run(&self, template: &PromptTemplate, vars: &[(&str, &str)]) -> Result<String> {
        let prompt = prompts::render(template, vars)?;
        info!(template = template.name, "Requesting generation");
        let content = self.generator.generate(&prompt).await?;
        debug!(template = template.name, chars = content.len(), "Generation finished");
        Ok(content)
    }
}

//! Two-stage prompt enhancement pipeline.
//!
//! Stage one asks the model to evaluate the raw prompt against the rubric;
//! stage two feeds that report back with the raw prompt and asks for a
//! revision. The revised prompt is pulled out of the first fenced block.

use std::sync::Arc;

use enhancer_core::config::DEFAULT_MODEL;
use enhancer_core::fence::extract_prompt;
use enhancer_core::generation::{GenerationError, GenerationRequest, TextGenerator};
use thiserror::Error;

use crate::instructions::{
    EVALUATOR_SYSTEM_INSTRUCTION, MODIFIER_SYSTEM_INSTRUCTION, render_evaluate_request,
    render_modify_request,
};

/// Why an enhancement did not produce a prompt.
///
/// The `Display` text is what the user sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnhanceError {
    #[error("Prompt cannot be empty.")]
    EmptyPrompt,

    #[error(
        "API key is not configured. Set GEMINI_API_KEY (or API_KEY) or add it to secret.json."
    )]
    MissingApiKey,

    #[error("Invalid API Key. Please check your configuration.")]
    InvalidApiKey,

    #[error("An error occurred while communicating with the Gemini API: {0}")]
    Remote(String),

    #[error("Failed to build the request: {0}")]
    Template(String),
}

impl EnhanceError {
    /// Precondition failures are raised before any remote call.
    pub fn is_precondition(&self) -> bool {
        matches!(self, EnhanceError::EmptyPrompt | EnhanceError::MissingApiKey)
    }
}

impl From<GenerationError> for EnhanceError {
    fn from(err: GenerationError) -> Self {
        if err.is_invalid_api_key() {
            EnhanceError::InvalidApiKey
        } else {
            EnhanceError::Remote(err.to_string())
        }
    }
}

impl From<minijinja::Error> for EnhanceError {
    fn from(err: minijinja::Error) -> Self {
        EnhanceError::Template(err.to_string())
    }
}

/// Runs the evaluate-then-revise pipeline against a [`TextGenerator`].
///
/// Stateless between calls: no retry, no caching, no partial results.
#[derive(Clone)]
pub struct PromptEnhancer {
    generator: Arc<dyn TextGenerator>,
    model: String,
}

impl PromptEnhancer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Sets the model identifier used for both stages.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Enhances `raw_prompt` and returns the revised prompt.
    ///
    /// # Errors
    ///
    /// - [`EnhanceError::EmptyPrompt`] for empty or whitespace-only input
    /// - [`EnhanceError::MissingApiKey`] when the generator has no credential
    /// - [`EnhanceError::InvalidApiKey`] when the endpoint rejects the key
    /// - [`EnhanceError::Remote`] for any other failure of either call
    pub async fn enhance(&self, raw_prompt: &str) -> Result<String, EnhanceError> {
        if raw_prompt.trim().is_empty() {
            return Err(EnhanceError::EmptyPrompt);
        }
        if !self.generator.has_credential() {
            return Err(EnhanceError::MissingApiKey);
        }

        let report = self.evaluate(raw_prompt).await?;
        let revised = self.modify(&report, raw_prompt).await?;

        let prompt = extract_prompt(&revised);
        tracing::info!(
            "[PromptEnhancer] Enhanced prompt ({} chars -> {} chars)",
            raw_prompt.chars().count(),
            prompt.chars().count()
        );
        Ok(prompt)
    }

    /// Stage one: returns the evaluation report verbatim.
    async fn evaluate(&self, raw_prompt: &str) -> Result<String, EnhanceError> {
        let request = GenerationRequest::new(
            &self.model,
            EVALUATOR_SYSTEM_INSTRUCTION,
            render_evaluate_request(raw_prompt)?,
        );

        tracing::debug!("[PromptEnhancer] Requesting evaluation");
        self.generator.generate(request).await.map_err(|err| {
            tracing::error!("[PromptEnhancer] Evaluation failed: {}", err);
            EnhanceError::from(err)
        })
    }

    /// Stage two: returns the raw revision response.
    async fn modify(&self, report: &str, raw_prompt: &str) -> Result<String, EnhanceError> {
        let request = GenerationRequest::new(
            &self.model,
            MODIFIER_SYSTEM_INSTRUCTION,
            render_modify_request(report, raw_prompt)?,
        );

        tracing::debug!("[PromptEnhancer] Requesting revision");
        self.generator.generate(request).await.map_err(|err| {
            tracing::error!("[PromptEnhancer] Revision failed: {}", err);
            EnhanceError::from(err)
        })
    }
}

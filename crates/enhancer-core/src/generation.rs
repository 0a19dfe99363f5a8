//! Remote text-generation port.
//!
//! The pipeline only needs "model + system instruction + content in, text
//! out". Concrete clients (the Gemini REST agent, scripted fakes in tests)
//! implement [`TextGenerator`].

use async_trait::async_trait;
use thiserror::Error;

/// A single generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Model identifier (e.g. "gemini-2.5-flash")
    pub model: String,
    /// System instruction sent alongside the content
    pub system_instruction: String,
    /// User content
    pub contents: String,
}

impl GenerationRequest {
    pub fn new(
        model: impl Into<String>,
        system_instruction: impl Into<String>,
        contents: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system_instruction: system_instruction.into(),
            contents: contents.into(),
        }
    }
}

/// Failure of a generation call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The request never produced an HTTP response (DNS, connect, TLS, ...)
    #[error("request failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status
    #[error("{message}")]
    Api {
        status_code: Option<u16>,
        message: String,
    },

    /// The endpoint answered but the body carried no usable text
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl GenerationError {
    /// Whether the error text says the API key was rejected.
    pub fn is_invalid_api_key(&self) -> bool {
        self.to_string().contains("API key not valid")
    }
}

/// A remote text-generation endpoint.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Whether a credential is available. Callers check this before issuing
    /// any request so a missing key fails fast without network traffic.
    fn has_credential(&self) -> bool {
        true
    }

    /// Issues one generation call and returns the response text.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}

//! GeminiApiAgent - Direct REST API implementation for Gemini.
//!
//! Calls `generateContent` with a system instruction and a single user turn.

use async_trait::async_trait;
use enhancer_core::config::DEFAULT_BASE_URL;
use enhancer_core::generation::{GenerationError, GenerationRequest, TextGenerator};
use enhancer_core::secret::SecretService;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Text generator that talks to the Gemini HTTP API.
///
/// The agent is built once per process. An agent without a key can still be
/// constructed; `has_credential` reports the gap so callers fail before any
/// request is sent.
#[derive(Clone)]
pub struct GeminiApiAgent {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiApiAgent {
    /// Creates a new agent with the provided API key.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Resolves the key through a [`SecretService`].
    pub async fn from_secret_service(service: &dyn SecretService) -> Self {
        let api_key = service.gemini_api_key().await;
        if api_key.is_none() {
            tracing::debug!("[GeminiApiAgent] No API key configured");
        }
        Self::new(api_key)
    }

    /// Overrides the endpoint base URL (`.../v1beta/models`).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str, api_key: &str) -> String {
        format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            model = model,
            api_key = api_key
        )
    }

    async fn send_request(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<String, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| GenerationError::Api {
            status_code: None,
            message: "API key is not configured".to_string(),
        })?;

        tracing::debug!("[GeminiApiAgent] generateContent model={}", model);

        let response = self
            .client
            .post(self.endpoint(model, api_key))
            .json(body)
            .send()
            .await
            .map_err(|err| GenerationError::Transport(err.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            let error = map_http_error(status, &body_text);
            tracing::warn!("[GeminiApiAgent] HTTP {}: {}", status.as_u16(), error);
            return Err(error);
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            GenerationError::InvalidResponse(format!("Failed to parse Gemini response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl TextGenerator for GeminiApiAgent {
    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let body = GenerateContentRequest::from_request(&request);
        self.send_request(&request.model, &body).await
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

impl GenerateContentRequest {
    fn from_request(request: &GenerationRequest) -> Self {
        let system_instruction = Some(&request.system_instruction)
            .filter(|text| !text.trim().is_empty())
            .map(|text| Content {
                role: "system".to_string(),
                parts: vec![Part {
                    text: text.to_string(),
                }],
            });

        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: request.contents.clone(),
                }],
            }],
            system_instruction,
        }
    }
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Concatenates the text parts of the first candidate.
fn extract_text_response(response: GenerateContentResponse) -> Result<String, GenerationError> {
    let parts = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .unwrap_or_default();

    let texts: Vec<String> = parts.into_iter().filter_map(|part| part.text).collect();
    if texts.is_empty() {
        return Err(GenerationError::InvalidResponse(
            "Gemini API returned no text in the response candidates".into(),
        ));
    }

    Ok(texts.concat())
}

fn map_http_error(status: StatusCode, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    GenerationError::Api {
        status_code: Some(status.as_u16()),
        message,
    }
}

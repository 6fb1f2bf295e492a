//! Chat-completion client for the language model service.
//!
//! This crate provides a Rust client for an OpenAI-compatible
//! `/chat/completions` endpoint. It handles:
//! - Building the single-message request body with per-call sampling settings
//! - Bearer authentication and request timeouts
//! - Extracting the first choice's message content
//! - Classifying failures so callers can tell connectivity loss apart
//!
//! The `ChatCompletion` trait is the seam the pipeline stages depend on;
//! `OpenAiClient` is the production implementation.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

/// Errors that can occur when talking to the LLM service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmClientError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// The request never produced an HTTP response
    #[error("Request to LLM service failed: {message}")]
    Transport { message: String, network: bool },

    /// The service answered with a non-success status
    #[error("LLM service returned status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("Invalid response from LLM service: {0}")]
    InvalidResponse(String),
}

impl LlmClientError {
    /// True for connection failures and timeouts.
    pub fn is_network(&self) -> bool {
        matches!(self, LlmClientError::Transport { network: true, .. })
    }
}

impl From<reqwest::Error> for LlmClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return LlmClientError::InvalidResponse(e.to_string());
        }
        LlmClientError::Transport {
            message: e.to_string(),
            network: e.is_connect() || e.is_timeout(),
        }
    }
}

/// One prompt plus the sampling settings to send it with.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            temperature,
            max_tokens,
        }
    }
}

/// Anything that can answer a single-prompt chat completion.
///
/// Implementations return the first choice's content, trimmed. A reply
/// without any content comes back as an empty string, not an error.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmClientError>;
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ChatResponse {
    fn first_content(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default()
    }
}

// =============================================================================
// Client
// =============================================================================

/// Client for an OpenAI-compatible chat completion service.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// Create a client.
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. "https://api.openai.com/v1"
    /// * `api_key` - Bearer token
    /// * `model` - Model identifier, e.g. "gpt-4o-mini"
    /// * `timeout` - Applied to every request
    pub fn new(
        base_url: impl AsRef<str>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmClientError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", base_url.as_ref().trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Full URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatCompletion for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmClientError> {
        debug!(
            "Sending completion request (model={}, temperature={}, max_tokens={})",
            self.model, request.temperature, request.max_tokens
        );
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .ok()
                .and_then(|envelope| envelope.error)
                .and_then(|body| body.message);
            error!(
                "LLM service returned {}: {}",
                status,
                message.as_deref().unwrap_or("no error message")
            );
            return Err(LlmClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        Ok(parsed.first_content())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
            temperature: 0.7,
            max_tokens: 50,
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
        assert_eq!(json["max_tokens"], 50);
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_first_content_is_trimmed() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  fr\n"}},{"message":{"content":"de"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.first_content(), "fr");
    }

    #[test]
    fn test_missing_content_becomes_empty() {
        for raw in [
            r#"{"choices":[]}"#,
            r#"{}"#,
            r#"{"choices":[{"message":null}]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
        ] {
            let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
            assert_eq!(parsed.first_content(), "", "for {}", raw);
        }
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let client =
            OpenAiClient::new("https://api.openai.com/v1/", "k", "gpt-4o-mini", Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.endpoint(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client =
            OpenAiClient::new("http://localhost:1", "sk-secret", "m", Duration::from_secs(5)).unwrap();
        assert!(!format!("{:?}", client).contains("sk-secret"));
    }

    #[test]
    fn test_network_classification() {
        let network = LlmClientError::Transport {
            message: "connection refused".into(),
            network: true,
        };
        let other = LlmClientError::Status {
            status: 500,
            message: None,
        };
        assert!(network.is_network());
        assert!(!other.is_network());
    }
}

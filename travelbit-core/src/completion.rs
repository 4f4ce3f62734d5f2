//! Completion client for the itinerary generator.
//!
//! Provides a `CompletionBackend` trait with one production implementation,
//! [`OpenAiCompletionClient`], which talks to an OpenAI-compatible
//! `/chat/completions` endpoint. There is no retry: a failed call is reported
//! once and the caller decides what to tell the user.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CompletionConfig;

// ============================================================================
// CompletionBackend trait
// ============================================================================

/// Abstraction over text-generation providers.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Generate text for `prompt` under the given system instruction.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CompletionError>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

// ============================================================================
// Error types
// ============================================================================

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Completion response contained no text")]
    EmptyResponse,

    #[error("Missing API key")]
    MissingApiKey,
}

// ============================================================================
// OpenAI API structs (private)
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: Option<OpenAiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

// ============================================================================
// OpenAiCompletionClient
// ============================================================================

/// Chat-completions client. A missing API key is reported by `complete`,
/// not by the constructor, so the server can start without one.
#[derive(Debug, Clone)]
pub struct OpenAiCompletionClient {
    client: Client,
    config: CompletionConfig,
    base_url: String,
}

impl OpenAiCompletionClient {
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let base_url = config.base_url.clone();
        Self::with_base_url(config, base_url)
    }

    /// Create a client against a custom base URL (mock servers, proxies).
    pub fn with_base_url(
        config: CompletionConfig,
        base_url: String,
    ) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl CompletionBackend for OpenAiCompletionClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, CompletionError> {
        let api_key = match self.config.api_key.as_deref() {
            Some(k) if !k.trim().is_empty() => k,
            _ => return Err(CompletionError::MissingApiKey),
        };

        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiErrorResponse>(&error_body)
                .ok()
                .and_then(|e| e.error)
                .map(|e| e.message)
                .unwrap_or(error_body);

            tracing::error!(code = status.as_u16(), message = %message, "Completion API error");

            return Err(CompletionError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(CompletionError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// ============================================================================
// TESTS
// ============================================================================

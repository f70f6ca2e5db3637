//! HTTP client for OpenAI-compatible chat completion APIs.
//!
//! Sends `POST {base_url}/chat/completions` with a system and a user message and
//! returns `choices[0].message.content`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Generator;
use crate::config::LlmConfig;
use crate::models::Prompt;

/// Generation errors. All of them are fatal to the calling command.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Missing LLM credentials: set OPENAI_API_KEY")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unauthorized: LLM API key rejected")]
    Unauthorized,

    #[error("Bad request (check MODEL_NAME): {0}")]
    BadRequest(String),

    #[error("Model not found (check MODEL_NAME): {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Model returned no choices")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
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
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: Client,
}

impl OpenAiClient {
    /// Create a client from configuration.
    ///
    /// A missing API key is only reported when [`Generator::generate`] is
    /// called, before any network traffic.
    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(&config.base_url, config.api_key.clone(), &config.model)
    }

    /// Create with explicit configuration.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
            client: Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Handle response, converting HTTP errors to GenerationError.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<ChatResponse, GenerationError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            match status {
                StatusCode::NOT_FOUND => Err(GenerationError::NotFound(body)),
                StatusCode::BAD_REQUEST => Err(GenerationError::BadRequest(body)),
                StatusCode::UNAUTHORIZED => Err(GenerationError::Unauthorized),
                _ => Err(GenerationError::Server(format!("{}: {}", status, body))),
            }
        }
    }
}

#[async_trait]
impl Generator for OpenAiClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(
            model = %self.model,
            %url,
            system_bytes = prompt.system.len(),
            user_bytes = prompt.user.len(),
            "Sending chat completion"
        );

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;
        let completion = self.handle_response(response).await?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .ok_or(GenerationError::EmptyResponse)?
            .message
            .content
            .unwrap_or_default();

        tracing::info!(model = %self.model, bytes = text.len(), "Received completion");
        Ok(text)
    }
}

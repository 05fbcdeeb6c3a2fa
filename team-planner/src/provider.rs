//! Reasoning-service boundary.
//!
//! The pipeline depends only on the send/receive contract of
//! [`ReasoningService`]. The bundled implementation talks to any
//! OpenAI-compatible chat-completions endpoint over HTTP; credentials and
//! endpoint come from the environment (a `.env` file is honored).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the chat-completions base URL.
pub const ENV_API_BASE: &str = "TEAM_PLANNER_API_BASE";
/// Environment variable holding the bearer token.
pub const ENV_API_KEY: &str = "TEAM_PLANNER_API_KEY";
/// Environment variable selecting the model.
pub const ENV_MODEL: &str = "TEAM_PLANNER_MODEL";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Failures at the reasoning-service boundary. The pipeline surfaces these
/// without retrying.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("service response contained no completion text")]
    EmptyCompletion,

    #[error("provider configuration error: {0}")]
    Config(String),
}

/// Text-in/text-out inference collaborator.
#[async_trait]
pub trait ReasoningService: Send + Sync {
    async fn ask(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Connection settings for [`OpenAiCompatClient`].
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Read settings from the environment.
    ///
    /// `TEAM_PLANNER_API_BASE` and `TEAM_PLANNER_MODEL` fall back to an
    /// OpenAI-shaped default; the API key is required.
    pub fn from_env() -> Result<Self, ProviderError> {
        let base_url = std::env::var(ENV_API_BASE)
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model =
            std::env::var(ENV_MODEL).unwrap_or_else(|_| "gpt-4-turbo".to_string());
        let api_key = std::env::var(ENV_API_KEY)
            .map_err(|_| ProviderError::Config(format!("{} is not set", ENV_API_KEY)))?;

        Ok(Self {
            base_url,
            api_key,
            model,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// HTTP client for OpenAI-compatible chat-completions endpoints.
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl OpenAiCompatClient {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(ProviderConfig::from_env()?)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ReasoningService for OpenAiCompatClient {
    async fn ask(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: ChatResponse = response.json().await?;
        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(ProviderError::EmptyCompletion)
    }
}

use crate::error::ClaudeClientError;
use crate::types::{CompletionRequest, MessagesRequest, MessagesResponse, WireMessage};
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";

// ─── Completion ──────────────────────────────────────────────────────────────

/// Anything that turns a prompt into model text. The server holds one of
/// these behind an `Arc<dyn Completion>` so tests can swap in a fake.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

// ─── ClientConfig ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub max_retries: u32,
    pub api_base: String,
    /// First backoff delay; doubled on every further attempt.
    pub retry_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1500,
            timeout: Duration::from_secs(60),
            max_retries: 2,
            api_base: DEFAULT_API_BASE.to_string(),
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl ClientConfig {
    /// Default config with the key taken from `ANTHROPIC_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            ..Default::default()
        }
    }
}

// ─── AnthropicClient ─────────────────────────────────────────────────────────

pub struct AnthropicClient {
    config: ClientConfig,
    http: Client,
}

impl AnthropicClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ClaudeClientError::MissingApiKey);
        }
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_once(&self, request: &CompletionRequest) -> Result<String> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            system: request.system.as_deref(),
            messages: vec![WireMessage {
                role: "user",
                content: &request.prompt,
            }],
        };

        let response = self
            .http
            .post(format!("{}/messages", self.config.api_base.trim_end_matches('/')))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClaudeClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        let text = parsed.text();
        if text.trim().is_empty() {
            return Err(ClaudeClientError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl Completion for AnthropicClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.send_once(&request).await {
                Ok(text) => {
                    debug!(model = %self.config.model, chars = text.len(), "completion received");
                    return Ok(text);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.config.retry_delay * 2u32.pow(attempt);
                    attempt += 1;
                    warn!(
                        error = %e,
                        attempt,
                        max_retries = self.config.max_retries,
                        "Anthropic request failed, retrying in {delay:?}"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

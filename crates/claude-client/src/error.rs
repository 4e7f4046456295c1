use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaudeClientError {
    #[error("ANTHROPIC_API_KEY is not set")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Anthropic API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("model reply contained no text")]
    EmptyResponse,

    #[error("model reply is not valid JSON: {0}")]
    InvalidJson(String),
}

impl ClaudeClientError {
    /// Transport failures and 429/5xx responses are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClaudeClientError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ClaudeClientError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

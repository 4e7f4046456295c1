//! `claude-client`: prompt-in, text-out access to the Anthropic Messages API.
//!
//! # Architecture
//!
//! ```text
//! CompletionRequest
//!     │
//!     ▼
//! dyn Completion      ← trait seam; AnthropicClient in production,
//!     │                  canned fakes in tests
//!     ▼
//! AnthropicClient     ← POST {api_base}/messages, retries with backoff
//!     │
//!     ▼
//! String              ← concatenated text blocks
//!     │
//!     ▼
//! parse_json_reply    ← strict JSON, fenced block, or embedded span
//! ```

pub mod client;
pub mod error;
pub mod parse;
pub mod types;

#[cfg(test)]
mod tests;

pub use client::{AnthropicClient, ClientConfig, Completion, DEFAULT_API_BASE, DEFAULT_MODEL};
pub use error::ClaudeClientError;
pub use parse::parse_json_reply;
pub use types::CompletionRequest;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ClaudeClientError>;

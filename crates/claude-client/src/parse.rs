use crate::error::ClaudeClientError;
use crate::Result;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static FENCE_RE: OnceLock<Regex> = OnceLock::new();

fn fence_re() -> &'static Regex {
    FENCE_RE.get_or_init(|| Regex::new(r"(?s)```(?:json|JSON)?\s*\n(.*?)```").unwrap())
}

/// Parse a model reply that is supposed to be JSON.
///
/// Tried in order: the whole reply, the first fenced code block, then the
/// widest `{...}` or `[...]` span.
pub fn parse_json_reply(reply: &str) -> Result<Value> {
    let trimmed = reply.trim();
    if let Ok(v) = serde_json::from_str(trimmed) {
        return Ok(v);
    }

    if let Some(block) = fence_re().captures(trimmed).and_then(|c| c.get(1)) {
        if let Ok(v) = serde_json::from_str(block.as_str().trim()) {
            return Ok(v);
        }
    }

    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(start), Some(end)) = (trimmed.find(open), trimmed.rfind(close)) {
            if start < end {
                if let Ok(v) = serde_json::from_str(&trimmed[start..=end]) {
                    return Ok(v);
                }
            }
        }
    }

    let preview: String = trimmed.chars().take(80).collect();
    Err(ClaudeClientError::InvalidJson(preview))
}

//! Upstream outcome types and error definitions.

use serde_json::Value;
use thiserror::Error;

/// Longest upstream body excerpt kept for logging.
pub const BODY_SNIPPET_CHARS: usize = 200;

/// Classified failure of one call to the repository inspector.
///
/// Details are for operator logs only; they are never shown to clients.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UpstreamFailure {
    /// Upstream answered 404 (repository or file unknown).
    #[error("resource not found upstream")]
    NotFound,

    /// Upstream could not be reached, or did not answer in time.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    /// Upstream answered with an unexpected status.
    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Upstream answered 2xx but the body was not usable JSON.
    #[error("invalid upstream payload: {0}")]
    InvalidPayload(String),
}

/// Result of one upstream call: the raw JSON payload or a classified failure.
pub type UpstreamResult = Result<Value, UpstreamFailure>;

/// Errors raised while building the upstream client.
#[derive(Debug, Error)]
pub enum ClientInitError {
    #[error("invalid upstream base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Truncate an upstream body for logging.
pub fn body_snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.chars().count() <= BODY_SNIPPET_CHARS {
        trimmed.to_string()
    } else {
        let mut snippet: String = trimmed.chars().take(BODY_SNIPPET_CHARS).collect();
        snippet.push('…');
        snippet
    }
}

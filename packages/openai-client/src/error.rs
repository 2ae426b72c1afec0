//! Error types for the completion client.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// Completion client errors.
///
/// Rate limiting and authorization failures get their own variants so callers
/// can decide whether a retry can help without inspecting status codes.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream answered 429
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Upstream answered 401 or 403
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No response within the request timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Network error (connection refused, DNS, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// Any other non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl OpenAIError {
    /// Classify a non-success HTTP status and its body.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            429 => Self::RateLimited(body),
            401 | 403 => Self::Unauthorized(body),
            _ => Self::Api {
                status,
                message: body,
            },
        }
    }

    /// Whether waiting and trying again may succeed.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }

    /// Whether the credentials are the problem.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

//! Typed errors for company search and enrichment.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CompanyError>;

#[derive(Debug, Error)]
pub enum CompanyError {
    /// The caller's query was empty or otherwise unusable
    #[error("invalid query: {0}")]
    QueryParse(String),

    /// The language model returned text that could not be coerced into filters
    #[error("malformed model response")]
    MalformedResponse { original: String, extracted: Option<String> },

    /// Rate limited or unreachable upstream; the caller may retry later
    #[error("upstream unavailable: {message}")]
    UpstreamUnavailable { rate_limited: bool, message: String },

    /// Credentials rejected by the upstream service
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("company not found: {0}")]
    NotFound(String),

    /// Homepage unreachable or website value malformed
    #[error("scrape failed: {0}")]
    Scrape(String),

    /// Summarisation kept failing with rate limits
    #[error("upstream exhausted after {attempts} attempts: {last_error}")]
    UpstreamExhausted { attempts: u32, last_error: String },

    /// Non-retried summarisation failure
    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("storage error: {0}")]
    Storage(#[source] anyhow::Error),
}

impl CompanyError {
    /// Map a language-model failure on the interpreter path.
    pub fn from_interpreter(err: openai_client::OpenAIError) -> Self {
        use openai_client::OpenAIError;

        match err {
            OpenAIError::RateLimited(message) => Self::UpstreamUnavailable {
                rate_limited: true,
                message,
            },
            OpenAIError::Unauthorized(message) | OpenAIError::Config(message) => {
                Self::Configuration(message)
            }
            OpenAIError::Parse(message) => Self::MalformedResponse {
                original: message,
                extracted: None,
            },
            other => Self::UpstreamUnavailable {
                rate_limited: false,
                message: other.to_string(),
            },
        }
    }
}

impl From<anyhow::Error> for CompanyError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(err)
    }
}

//! Enrichment orchestrator
//!
//! `Fetching -> Summarizing -> Persisting -> Done`, or `Failed` from any
//! state. A company that already has a summary short-circuits before any
//! scrape or model call.
//!
//! The cached check is read-then-write: two concurrent calls for the same
//! company may both scrape and summarize, and the later save wins.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use openai_client::OpenAIError;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use super::error::{CompanyError, Result};
use super::models::Company;
use super::store::CompanyStore;
use crate::kernel::{BaseAI, BaseWebScraper};

const SUMMARY_PROMPT: &str =
    "Summarize this company and its product in about 100 words, based on the text of its homepage.";

// =============================================================================
// Retry policy
// =============================================================================

/// Linear backoff: the wait after attempt `n` is `n * backoff_unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.backoff_unit * attempt
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EnrichmentConfig {
    pub max_attempts: u32,
    pub backoff_unit: Duration,
    /// Bound on each scrape and each summarisation call.
    pub request_timeout: Duration,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            max_attempts: retry.max_attempts,
            backoff_unit: retry.backoff_unit,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl EnrichmentConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            backoff_unit: self.backoff_unit,
        }
    }
}

// =============================================================================
// State
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentState {
    Fetching,
    Summarizing,
    Persisting,
    Done,
    Failed(String),
}

/// Retry bookkeeping for one summarisation; dropped when the call returns.
#[derive(Debug, Default)]
pub struct EnrichmentAttempt {
    pub attempt: u32,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SummaryResult {
    pub company: Company,
    /// True when the summary was already stored and nothing was called.
    pub cached: bool,
}

impl SummaryResult {
    pub fn summary(&self) -> &str {
        self.company.ai_summary.as_deref().unwrap_or_default()
    }
}

/// Turn a stored website value into an absolute http(s) URL.
///
/// Values without a scheme get `https://`.
pub fn normalize_website(raw: &str) -> std::result::Result<Url, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("website is empty".into());
    }

    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&candidate).map_err(|e| format!("invalid website {trimmed:?}: {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(format!("website {trimmed:?} has no host")),
    }
}

/// A scheme is a `://` before any path, query or fragment.
fn has_scheme(value: &str) -> bool {
    let authority_end = value.find(['/', '?', '#']).unwrap_or(value.len());
    value[..authority_end].contains(':') && value[authority_end..].starts_with("//")
}

// =============================================================================
// Orchestrator
// =============================================================================

pub struct EnrichmentOrchestrator {
    store: Arc<dyn CompanyStore>,
    scraper: Arc<dyn BaseWebScraper>,
    ai: Arc<dyn BaseAI>,
    config: EnrichmentConfig,
}

impl EnrichmentOrchestrator {
    pub fn new(
        store: Arc<dyn CompanyStore>,
        scraper: Arc<dyn BaseWebScraper>,
        ai: Arc<dyn BaseAI>,
        config: EnrichmentConfig,
    ) -> Self {
        Self {
            store,
            scraper,
            ai,
            config,
        }
    }

    /// Summarize a company's homepage and store the summary once.
    pub async fn enrich(&self, id: Uuid) -> Result<SummaryResult> {
        let mut state = EnrichmentState::Fetching;
        let result = self.run(id, &mut state).await;

        match &result {
            Ok(_) => transition(id, &mut state, EnrichmentState::Done),
            Err(e) => transition(id, &mut state, EnrichmentState::Failed(e.to_string())),
        }
        result
    }

    async fn run(&self, id: Uuid, state: &mut EnrichmentState) -> Result<SummaryResult> {
        let mut company = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CompanyError::NotFound(id.to_string()))?;

        if company.summary().is_some() {
            debug!(company_id = %id, "Summary already stored, skipping enrichment");
            return Ok(SummaryResult {
                company,
                cached: true,
            });
        }

        let url = normalize_website(&company.website).map_err(CompanyError::Scrape)?;
        let text = self.fetch_text(&url).await?;

        transition(id, state, EnrichmentState::Summarizing);
        let summary = self.summarize(id, &text).await?;

        transition(id, state, EnrichmentState::Persisting);
        company.ai_summary = Some(summary);
        company.updated_at = Utc::now();
        self.store.save(&company).await?;

        info!(company_id = %id, "Company enriched");
        Ok(SummaryResult {
            company,
            cached: false,
        })
    }

    async fn fetch_text(&self, url: &Url) -> Result<String> {
        let text = tokio::time::timeout(
            self.config.request_timeout,
            self.scraper.fetch_visible_text(url.as_str()),
        )
        .await
        .map_err(|_| CompanyError::Scrape(format!("timed out fetching {url}")))?
        .map_err(|e| CompanyError::Scrape(format!("{e:#}")))?;

        if text.trim().is_empty() {
            return Err(CompanyError::Scrape(format!("no visible text at {url}")));
        }
        Ok(text)
    }

    /// Summarisation with linear backoff on rate limits.
    async fn summarize(&self, id: Uuid, text: &str) -> Result<String> {
        let policy = self.config.retry_policy();
        let mut attempt = EnrichmentAttempt::default();

        loop {
            attempt.attempt += 1;

            let reply = tokio::time::timeout(
                self.config.request_timeout,
                self.ai.complete(SUMMARY_PROMPT, text),
            )
            .await;

            let err = match reply {
                Ok(Ok(summary)) if !summary.trim().is_empty() => {
                    return Ok(summary.trim().to_string())
                }
                Ok(Ok(_)) => return Err(CompanyError::Upstream("empty summary".into())),
                Ok(Err(e)) => e,
                Err(_) => {
                    return Err(CompanyError::Upstream(format!(
                        "no reply within {}s",
                        self.config.request_timeout.as_secs()
                    )))
                }
            };

            match err {
                OpenAIError::RateLimited(message) => {
                    attempt.last_error = Some(message);
                }
                OpenAIError::Unauthorized(message) | OpenAIError::Config(message) => {
                    return Err(CompanyError::Configuration(message))
                }
                other => return Err(CompanyError::Upstream(other.to_string())),
            }

            if attempt.attempt >= policy.max_attempts {
                return Err(CompanyError::UpstreamExhausted {
                    attempts: attempt.attempt,
                    last_error: attempt.last_error.unwrap_or_default(),
                });
            }

            let backoff = policy.backoff_after(attempt.attempt);
            warn!(
                company_id = %id,
                attempt = attempt.attempt,
                max_attempts = policy.max_attempts,
                backoff_ms = backoff.as_millis() as u64,
                "Summarisation rate limited, backing off"
            );
            tokio::time::sleep(backoff).await;
        }
    }
}

fn transition(id: Uuid, state: &mut EnrichmentState, next: EnrichmentState) {
    debug!(company_id = %id, from = ?state, to = ?next, "Enrichment state");
    *state = next;
}

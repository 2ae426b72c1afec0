// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (interpreting queries, enriching companies) lives in domain
// functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseWebScraper)

use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Complete a system instruction plus user content (returns raw text).
    ///
    /// No interpretation of the content happens here. Errors keep the
    /// rate-limit / unauthorized / generic distinction of
    /// [`openai_client::OpenAIError`].
    async fn complete(&self, system: &str, user: &str) -> openai_client::Result<String>;
}

// =============================================================================
// Web Scraper Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseWebScraper: Send + Sync {
    /// Fetch the human-readable text of a page, bounded in length.
    ///
    /// `url` is expected to be absolute. Network, HTTP status and decoding
    /// failures are all reported as errors.
    async fn fetch_visible_text(&self, url: &str) -> Result<String>;
}

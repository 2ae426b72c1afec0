use std::env;
use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;

use crate::common::pagination::{PageSizeConfig, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::domains::companies::{EnrichmentConfig, InterpreterConfig};
use crate::kernel::ScraperConfig;

pub const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_INTERPRET_MODEL: &str = "mistralai/mistral-7b-instruct:free";
pub const DEFAULT_SUMMARY_MODEL: &str = "mistralai/devstral-small:free";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub interpret_model: String,
    pub summary_model: String,
    pub default_page_size: NonZeroU32,
    pub max_page_size: NonZeroU32,
    pub request_timeout: Duration,
    pub retry_backoff: Duration,
    pub scrape_max_words: usize,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parse_or("PORT", 8000)?,
            llm_api_key: env::var("LLM_SECRET").context("LLM_SECRET must be set")?,
            llm_base_url: env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string()),
            interpret_model: env::var("INTERPRET_MODEL")
                .unwrap_or_else(|_| DEFAULT_INTERPRET_MODEL.to_string()),
            summary_model: env::var("SUMMARY_MODEL")
                .unwrap_or_else(|_| DEFAULT_SUMMARY_MODEL.to_string()),
            default_page_size: NonZeroU32::new(parse_or("DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?)
                .context("DEFAULT_PAGE_SIZE must be positive")?,
            max_page_size: NonZeroU32::new(parse_or("MAX_PAGE_SIZE", MAX_PAGE_SIZE)?)
                .context("MAX_PAGE_SIZE must be positive")?,
            request_timeout: Duration::from_secs(parse_or("REQUEST_TIMEOUT_SECS", 30)?),
            retry_backoff: Duration::from_millis(parse_or("RETRY_BACKOFF_MS", 1000)?),
            scrape_max_words: parse_or("SCRAPE_MAX_WORDS", 500)?,
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
        })
    }

    pub fn interpreter(&self) -> InterpreterConfig {
        InterpreterConfig {
            request_timeout: self.request_timeout,
        }
    }

    pub fn enrichment(&self) -> EnrichmentConfig {
        EnrichmentConfig {
            request_timeout: self.request_timeout,
            backoff_unit: self.retry_backoff,
            ..EnrichmentConfig::default()
        }
    }

    pub fn page_sizes(&self) -> PageSizeConfig {
        PageSizeConfig {
            default_limit: self.default_page_size,
            max_limit: self.max_page_size.max(self.default_page_size),
        }
    }

    pub fn scraper(&self) -> ScraperConfig {
        ScraperConfig {
            max_words: self.scrape_max_words,
            timeout: self.request_timeout,
        }
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number")),
        Err(_) => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_drops_blanks() {
        assert_eq!(
            split_list(" http://a.com, ,http://b.com "),
            vec!["http://a.com".to_string(), "http://b.com".to_string()]
        );
        assert!(split_list("").is_empty());
    }
}

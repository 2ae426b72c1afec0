//! Homepage text extractor - local HTTP + HTML parsing
//!
//! This implementation:
//! - Uses reqwest for HTTP requests (bounded by a request timeout)
//! - Reads at most `MAX_BODY_BYTES` of the response body
//! - Uses the scraper crate to walk the `<body>` text nodes
//! - Keeps only the first `max_words` whitespace-separated words
//!
//! Limitations:
//! - No JavaScript rendering (client-rendered pages yield little text)

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use scraper::{Html, Selector};
use tracing::{debug, warn};

use super::BaseWebScraper;

/// Upper bound on buffered HTML, independent of the word limit.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Elements whose text is never visible.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg", "iframe"];

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Copy)]
pub struct ScraperConfig {
    /// Maximum number of words returned.
    pub max_words: usize,
    /// Bound on the whole request (connect + body).
    pub timeout: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_words: 500,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Homepage scraper using reqwest + scraper
#[derive(Debug, Clone)]
pub struct SimpleScraper {
    client: reqwest::Client,
    config: ScraperConfig,
}

impl SimpleScraper {
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Fetch raw HTML from a URL, truncated at `MAX_BODY_BYTES`
    async fn fetch_html(&self, url: &str) -> Result<String> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to navigate to {url}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .context("Failed to read response body")?
        {
            let remaining = MAX_BODY_BYTES - body.len();
            if chunk.len() >= remaining {
                body.extend_from_slice(&chunk[..remaining]);
                debug!(url = %url, limit = MAX_BODY_BYTES, "Response body truncated");
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Visible text of the document body, limited to `max_words` words
    fn visible_text(html: &str, max_words: usize) -> String {
        let document = Html::parse_document(html);
        let root = Selector::parse("body")
            .ok()
            .and_then(|selector| document.select(&selector).next())
            .unwrap_or_else(|| document.root_element());

        let mut words: Vec<&str> = Vec::new();
        for node in root.descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| SKIPPED_TAGS.contains(&el.name()))
            });
            if hidden {
                continue;
            }

            for word in text.split_whitespace() {
                if words.len() >= max_words {
                    return words.join(" ");
                }
                words.push(word);
            }
        }

        words.join(" ")
    }
}

#[async_trait]
impl BaseWebScraper for SimpleScraper {
    async fn fetch_visible_text(&self, url: &str) -> Result<String> {
        debug!(url = %url, "Scraping homepage");

        let html = self.fetch_html(url).await?;
        let text = Self::visible_text(&html, self.config.max_words);

        if text.is_empty() {
            warn!(url = %url, "Page has no visible text");
        }

        Ok(text)
    }
}

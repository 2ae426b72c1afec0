// Test doubles for the kernel collaborator traits
//
// Provides mock services that can be injected into the interpreter and the
// enrichment orchestrator for tests.

use anyhow::Result;
use async_trait::async_trait;
use openai_client::OpenAIError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use super::{BaseAI, BaseWebScraper};

// =============================================================================
// Mock AI (Generic LLM capabilities)
// =============================================================================

/// One scripted reply of the mock AI.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    RateLimited,
    Unauthorized,
    Timeout,
    Failure(String),
}

impl MockReply {
    fn into_result(self) -> openai_client::Result<String> {
        match self {
            Self::Text(text) => Ok(text),
            Self::RateLimited => Err(OpenAIError::RateLimited("mock rate limit".into())),
            Self::Unauthorized => Err(OpenAIError::Unauthorized("mock invalid key".into())),
            Self::Timeout => Err(OpenAIError::Timeout(30)),
            Self::Failure(message) => Err(OpenAIError::Api {
                status: 500,
                message,
            }),
        }
    }
}

/// A prompt captured by the mock AI.
#[derive(Debug, Clone)]
pub struct MockAICall {
    pub system: String,
    pub user: String,
    pub at: Instant,
}

#[derive(Clone)]
pub struct MockAI {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    fallback: MockReply,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<MockAICall>>>,
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            fallback: MockReply::Text("Mock AI response".to_string()),
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a text response
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.with_reply(MockReply::Text(response.into()))
    }

    /// Queue any scripted reply
    pub fn with_reply(self, reply: MockReply) -> Self {
        self.push_reply(reply);
        self
    }

    /// Queue a reply on a shared handle
    pub fn push_reply(&self, reply: MockReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Queue a text response on a shared handle
    pub fn push_response(&self, response: impl Into<String>) {
        self.push_reply(MockReply::Text(response.into()));
    }

    /// Queue a rate-limit failure
    pub fn with_rate_limit(self) -> Self {
        self.with_reply(MockReply::RateLimited)
    }

    /// Reply used once the queue is empty
    pub fn with_fallback(mut self, reply: MockReply) -> Self {
        self.fallback = reply;
        self
    }

    /// Sleep before every reply (to exercise timeouts)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All prompts sent to the AI
    pub fn calls(&self) -> Vec<MockAICall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of times the AI was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Check if a user prompt containing the given text was sent
    pub fn was_called_with(&self, text: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.user.contains(text))
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, system: &str, user: &str) -> openai_client::Result<String> {
        self.calls.lock().unwrap().push(MockAICall {
            system: system.to_string(),
            user: user.to_string(),
            at: Instant::now(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        reply.into_result()
    }
}

// =============================================================================
// Mock Web Scraper
// =============================================================================

#[derive(Clone)]
pub struct MockWebScraper {
    responses: Arc<Mutex<VecDeque<std::result::Result<String, String>>>>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for MockWebScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWebScraper {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sleep before every fetch (to exercise timeouts)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue visible text to return
    pub fn with_response(self, text: &str) -> Self {
        self.push_response(text);
        self
    }

    /// Queue visible text on a shared handle
    pub fn push_response(&self, text: &str) {
        self.responses.lock().unwrap().push_back(Ok(text.to_string()));
    }

    /// Queue a navigation failure
    pub fn with_failure(self, message: &str) -> Self {
        self.push_failure(message);
        self
    }

    /// Queue a navigation failure on a shared handle
    pub fn push_failure(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    /// All URLs that were fetched
    pub fn scrape_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Check if a URL was fetched
    pub fn was_scraped(&self, url: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|u| u == url)
    }
}

#[async_trait]
impl BaseWebScraper for MockWebScraper {
    async fn fetch_visible_text(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Ok("Mock Content. This is mock scraped homepage text.".to_string()),
        }
    }
}

//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod llm_request;
pub mod simple_scraper;
pub mod test_dependencies;
pub mod traits;

/// Sampling settings for filter interpretation (short, low-variance JSON).
pub const INTERPRET_TEMPERATURE: f32 = 0.3;
pub const INTERPRET_MAX_TOKENS: u32 = 150;

pub use deps::{ServerDeps, Upstreams};
pub use llm_request::{CompletionOptions, OpenAICompleter};
pub use simple_scraper::{ScraperConfig, SimpleScraper};
pub use test_dependencies::{MockAI, MockReply, MockWebScraper};
pub use traits::*;

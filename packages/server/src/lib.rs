// Company Search - API Core
//
// Structured and natural-language company search, AI summaries of company
// homepages, and saved prospects. Route handlers live in `server/`, business
// logic in `domains/`, infrastructure traits and adapters in `kernel/`.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;

// Companies domain - search and AI enrichment of company records
//
// Responsibilities:
// - Filter schema shared by structured and natural-language search
// - Interpreting free-text queries into filters (via the language model)
// - Compiling filters into paginated store queries
// - Scrape -> summarize -> persist enrichment with rate-limit backoff

pub mod enrichment;
pub mod error;
pub mod filters;
pub mod interpreter;
pub mod models;
pub mod query;
pub mod store;

pub use enrichment::{
    normalize_website, EnrichmentConfig, EnrichmentOrchestrator, EnrichmentState, RetryPolicy,
    SummaryResult,
};
pub use error::CompanyError;
pub use filters::{CompanySize, FilterSet, SortField, SortOrder, SortSpec};
pub use interpreter::{extract_json_span, FilterInterpreter, InterpreterConfig};
pub use models::*;
pub use query::{compile, search, CompanyPredicate, CompiledQuery, Condition, TextField};
pub use store::{CompanyStore, MemoryCompanyStore, PostgresCompanyStore};

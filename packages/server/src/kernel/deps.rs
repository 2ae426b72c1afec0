//! Server dependencies for route handlers (using traits for testability)
//!
//! This module provides the central dependency container used by all routes.
//! Stores and upstream services are trait objects so tests can swap in the
//! in-memory stores and the mocks from `test_dependencies`.

use std::sync::Arc;

use sqlx::PgPool;

use crate::common::PageSizeConfig;
use crate::domains::companies::{
    CompanyStore, EnrichmentConfig, EnrichmentOrchestrator, FilterInterpreter, InterpreterConfig,
};
use crate::domains::prospects::{ProspectService, ProspectStore};
use crate::kernel::{BaseAI, BaseWebScraper};

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to routes
#[derive(Clone)]
pub struct ServerDeps {
    pub companies: Arc<dyn CompanyStore>,
    pub prospects: Arc<ProspectService>,
    pub interpreter: Arc<FilterInterpreter>,
    pub enrichment: Arc<EnrichmentOrchestrator>,
    pub page_sizes: PageSizeConfig,
    /// Present in production; in-memory test setups have no database.
    pub db_pool: Option<PgPool>,
}

/// Upstream services and per-component settings for [`ServerDeps::new`].
pub struct Upstreams {
    pub interpret_ai: Arc<dyn BaseAI>,
    pub summary_ai: Arc<dyn BaseAI>,
    pub scraper: Arc<dyn BaseWebScraper>,
    pub interpreter: InterpreterConfig,
    pub enrichment: EnrichmentConfig,
}

impl ServerDeps {
    /// Wire the domain services over the given stores and upstreams
    pub fn new(
        companies: Arc<dyn CompanyStore>,
        prospects: Arc<dyn ProspectStore>,
        upstreams: Upstreams,
        page_sizes: PageSizeConfig,
        db_pool: Option<PgPool>,
    ) -> Self {
        let interpreter = FilterInterpreter::new(upstreams.interpret_ai, upstreams.interpreter);
        let enrichment = EnrichmentOrchestrator::new(
            companies.clone(),
            upstreams.scraper,
            upstreams.summary_ai,
            upstreams.enrichment,
        );
        let prospects = ProspectService::new(prospects, companies.clone());

        Self {
            companies,
            prospects: Arc::new(prospects),
            interpreter: Arc::new(interpreter),
            enrichment: Arc::new(enrichment),
            page_sizes,
            db_pool,
        }
    }
}

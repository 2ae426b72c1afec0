//! Test harness over in-memory stores and mock upstreams.
//!
//! Each test gets a fresh router, fresh stores and fresh mocks. Requests go
//! through the full axum stack via `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use server_core::common::PageSizeConfig;
use server_core::domains::companies::{
    Company, CompanyStore, EnrichmentConfig, InterpreterConfig, MemoryCompanyStore,
};
use server_core::domains::prospects::MemoryProspectStore;
use server_core::kernel::{MockAI, MockWebScraper, ServerDeps, Upstreams};
use server_core::server::build_app;
use test_context::AsyncTestContext;
use tower::ServiceExt;

/// Test harness wiring the app to mocks.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let (status, body) = ctx.get("/api/companies/search").await;
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    pub app: Router,
    pub companies: Arc<MemoryCompanyStore>,
    /// Language model seen by the interpreter
    pub interpret_ai: MockAI,
    /// Language model seen by the summariser
    pub summary_ai: MockAI,
    pub scraper: MockWebScraper,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        Self::new()
    }

    async fn teardown(self) {
        // Stores and mocks are dropped with the harness
    }
}

impl TestHarness {
    pub fn new() -> Self {
        let companies = Arc::new(MemoryCompanyStore::new());
        let interpret_ai = MockAI::new();
        let summary_ai = MockAI::new();
        let scraper = MockWebScraper::new();

        let deps = ServerDeps::new(
            companies.clone(),
            Arc::new(MemoryProspectStore::new()),
            Upstreams {
                interpret_ai: Arc::new(interpret_ai.clone()),
                summary_ai: Arc::new(summary_ai.clone()),
                scraper: Arc::new(scraper.clone()),
                interpreter: InterpreterConfig::default(),
                enrichment: EnrichmentConfig {
                    backoff_unit: Duration::from_millis(20),
                    ..EnrichmentConfig::default()
                },
            },
            PageSizeConfig::default(),
            None,
        );

        Self {
            app: build_app(deps, &[]),
            companies,
            interpret_ai,
            summary_ai,
            scraper,
        }
    }

    /// Insert companies directly into the store.
    pub async fn seed(&self, companies: &[Company]) {
        self.companies
            .insert_many(companies)
            .await
            .expect("Failed to seed companies");
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(request.body(body).expect("Failed to build request"))
            .await
            .expect("Router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response is not JSON")
        };
        (status, json)
    }
}

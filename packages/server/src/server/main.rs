// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use openai_client::OpenAIClient;
use server_core::domains::companies::PostgresCompanyStore;
use server_core::domains::prospects::PostgresProspectStore;
use server_core::kernel::{
    CompletionOptions, OpenAICompleter, ServerDeps, SimpleScraper, Upstreams,
    INTERPRET_MAX_TOKENS, INTERPRET_TEMPERATURE,
};
use server_core::{server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Company Search API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Language model client shared by the interpreter and the summariser
    let client = Arc::new(
        OpenAIClient::new(config.llm_api_key.clone())
            .with_base_url(config.llm_base_url.clone())
            .with_timeout(config.request_timeout),
    );
    let interpret_ai = OpenAICompleter::new(
        client.clone(),
        CompletionOptions::new(config.interpret_model.clone())
            .temperature(INTERPRET_TEMPERATURE)
            .max_tokens(INTERPRET_MAX_TOKENS),
    );
    let summary_ai = OpenAICompleter::new(
        client,
        CompletionOptions::new(config.summary_model.clone()),
    );
    tracing::info!(
        interpret_model = %interpret_ai.model(),
        summary_model = %summary_ai.model(),
        "Language model configured"
    );

    let scraper = SimpleScraper::new(config.scraper()).context("Failed to create scraper")?;

    let deps = ServerDeps::new(
        Arc::new(PostgresCompanyStore::new(pool.clone())),
        Arc::new(PostgresProspectStore::new(pool.clone())),
        Upstreams {
            interpret_ai: Arc::new(interpret_ai),
            summary_ai: Arc::new(summary_ai),
            scraper: Arc::new(scraper),
            interpreter: config.interpreter(),
            enrichment: config.enrichment(),
        },
        config.page_sizes(),
        Some(pool),
    );

    // Build application
    let app = build_app(deps, &config.allowed_origins);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}

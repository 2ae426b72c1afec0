//! Bulk import of company records
//!
//! Reads newline-delimited JSON (one company per line), skips lines that do
//! not parse or lack `name` / `website`, and inserts in batches.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use server_core::domains::companies::{
    Company, CompanyImport, CompanyStore, PostgresCompanyStore,
};
use sqlx::postgres::PgPoolOptions;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "seed")]
#[command(about = "Import companies from a newline-delimited JSON file")]
struct Cli {
    /// Path to the JSONL dataset
    path: PathBuf,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Stop after this many valid records
    #[arg(long)]
    limit: Option<usize>,

    /// Records per insert
    #[arg(long, default_value_t = 100)]
    batch_size: usize,

    /// Delete all existing companies first
    #[arg(long)]
    clear: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let batch_size = cli.batch_size.max(1);

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&cli.database_url)
        .await
        .context("Failed to connect to database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    let store = PostgresCompanyStore::new(pool);

    if cli.clear {
        let removed = store.delete_all().await?;
        info!(removed, "Cleared existing companies");
    }

    let file = tokio::fs::File::open(&cli.path)
        .await
        .with_context(|| format!("Failed to open {}", cli.path.display()))?;
    let mut lines = BufReader::new(file).lines();

    let mut batch: Vec<Company> = Vec::with_capacity(batch_size);
    let mut accepted = 0usize;
    let mut skipped = 0usize;
    let mut progress = Progress::default();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await.context("Failed to read dataset")? {
        line_no += 1;
        if cli.limit.is_some_and(|limit| accepted >= limit) {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let company = match serde_json::from_str::<CompanyImport>(&line) {
            Ok(record) => record.into_company(),
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping unparseable line");
                None
            }
        };
        let Some(company) = company else {
            skipped += 1;
            continue;
        };

        accepted += 1;
        batch.push(company);
        if batch.len() >= batch_size {
            flush(&store, &mut batch, &mut progress).await?;
        }
    }
    flush(&store, &mut batch, &mut progress).await?;

    info!(inserted = progress.total, skipped, "Seeding complete");
    Ok(())
}

/// Running insert count. Conflicting ids are skipped by the store, so a
/// batch may insert fewer rows than it holds.
#[derive(Debug, Default)]
struct Progress {
    total: u64,
}

impl Progress {
    fn record(&mut self, batch: usize, inserted: u64) {
        self.total += inserted;
        info!(batch, inserted, total = self.total, "Inserted companies");
    }
}

async fn flush(
    store: &PostgresCompanyStore,
    batch: &mut Vec<Company>,
    progress: &mut Progress,
) -> Result<()> {
    if batch.is_empty() {
        return Ok(());
    }
    let count = store.insert_many(&batch[..]).await?;
    progress.record(batch.len(), count);
    batch.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_counts_only_inserted_rows() {
        let mut progress = Progress::default();

        progress.record(100, 0);
        assert_eq!(progress.total, 0);

        progress.record(100, 60);
        progress.record(40, 40);
        assert_eq!(progress.total, 100);
    }
}

//! Company record store
//!
//! The query compiler and the enrichment orchestrator only talk to this
//! trait. Postgres backs it in production, an in-memory map in tests.

mod memory;
mod postgres;

pub use memory::MemoryCompanyStore;
pub use postgres::PostgresCompanyStore;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use super::filters::SortSpec;
use super::models::Company;
use super::query::CompanyPredicate;

#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Records matching `predicate`, ordered by `sort`, windowed by `skip`/`take`.
    async fn find(
        &self,
        predicate: &CompanyPredicate,
        sort: SortSpec,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Company>>;

    /// Number of records matching `predicate`.
    async fn count(&self, predicate: &CompanyPredicate) -> Result<u64>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>>;

    /// Insert or fully replace a record by id.
    async fn save(&self, company: &Company) -> Result<()>;

    /// Bulk insert. Records whose id already exists are skipped. Returns the
    /// number inserted.
    async fn insert_many(&self, companies: &[Company]) -> Result<u64>;
}

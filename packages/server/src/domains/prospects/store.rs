//! Saved prospect storage

use std::sync::RwLock;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::SavedProspect;

#[async_trait]
pub trait ProspectStore: Send + Sync {
    /// Insert unless the company is already saved. Returns false on duplicate.
    async fn insert(&self, prospect: &SavedProspect) -> Result<bool>;

    /// All saved prospects, newest first.
    async fn list(&self) -> Result<Vec<SavedProspect>>;

    /// Remove the prospect for `company_id`, returning it if it existed.
    async fn delete_by_company(&self, company_id: Uuid) -> Result<Option<SavedProspect>>;
}

// =============================================================================
// In-memory
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryProspectStore {
    prospects: RwLock<Vec<SavedProspect>>,
}

impl MemoryProspectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProspectStore for MemoryProspectStore {
    async fn insert(&self, prospect: &SavedProspect) -> Result<bool> {
        let mut prospects = self
            .prospects
            .write()
            .map_err(|_| anyhow!("prospect store lock poisoned"))?;
        if prospects.iter().any(|p| p.company_id == prospect.company_id) {
            return Ok(false);
        }
        prospects.push(prospect.clone());
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<SavedProspect>> {
        let mut prospects = self
            .prospects
            .read()
            .map_err(|_| anyhow!("prospect store lock poisoned"))?
            .clone();
        prospects.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then(b.id.cmp(&a.id)));
        Ok(prospects)
    }

    async fn delete_by_company(&self, company_id: Uuid) -> Result<Option<SavedProspect>> {
        let mut prospects = self
            .prospects
            .write()
            .map_err(|_| anyhow!("prospect store lock poisoned"))?;
        let position = prospects.iter().position(|p| p.company_id == company_id);
        Ok(position.map(|i| prospects.remove(i)))
    }
}

// =============================================================================
// Postgres
// =============================================================================

#[derive(Debug, Clone)]
pub struct PostgresProspectStore {
    pool: PgPool,
}

impl PostgresProspectStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProspectStore for PostgresProspectStore {
    async fn insert(&self, prospect: &SavedProspect) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO saved_prospects (id, company_id, saved_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (company_id) DO NOTHING
            "#,
        )
        .bind(prospect.id)
        .bind(prospect.company_id)
        .bind(prospect.saved_at)
        .execute(&self.pool)
        .await
        .context("Failed to save prospect")?;
        Ok(result.rows_affected() == 1)
    }

    async fn list(&self) -> Result<Vec<SavedProspect>> {
        let prospects = sqlx::query_as::<_, SavedProspect>(
            "SELECT id, company_id, saved_at FROM saved_prospects ORDER BY saved_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list prospects")?;
        Ok(prospects)
    }

    async fn delete_by_company(&self, company_id: Uuid) -> Result<Option<SavedProspect>> {
        let prospect = sqlx::query_as::<_, SavedProspect>(
            "DELETE FROM saved_prospects WHERE company_id = $1 RETURNING id, company_id, saved_at",
        )
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to delete prospect")?;
        Ok(prospect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_memory_store_rejects_duplicates_and_lists_newest_first() {
        let store = MemoryProspectStore::new();
        let older = SavedProspect {
            saved_at: Utc::now() - Duration::minutes(5),
            ..SavedProspect::new(Uuid::now_v7())
        };
        let newer = SavedProspect::new(Uuid::now_v7());

        assert!(store.insert(&older).await.unwrap());
        assert!(store.insert(&newer).await.unwrap());
        assert!(!store.insert(&SavedProspect::new(older.company_id)).await.unwrap());

        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![newer.clone(), older.clone()]);

        let removed = store.delete_by_company(older.company_id).await.unwrap();
        assert_eq!(removed, Some(older.clone()));
        assert!(store
            .delete_by_company(older.company_id)
            .await
            .unwrap()
            .is_none());
    }
}

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use uuid::Uuid;

use super::CompanyStore;
use crate::domains::companies::filters::{SortField, SortOrder, SortSpec};
use crate::domains::companies::models::Company;
use crate::domains::companies::query::CompanyPredicate;

/// In-memory company store for tests and local development.
///
/// Ordering follows Postgres: text compares case-insensitively, NULLs sort
/// last ascending and first descending.
#[derive(Debug, Default)]
pub struct MemoryCompanyStore {
    companies: RwLock<HashMap<Uuid, Company>>,
}

impl MemoryCompanyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `companies`.
    pub fn with_companies(companies: impl IntoIterator<Item = Company>) -> Self {
        Self {
            companies: RwLock::new(companies.into_iter().map(|c| (c.id, c)).collect()),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<Uuid, Company>>> {
        self.companies
            .read()
            .map_err(|_| anyhow!("company store lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, Company>>> {
        self.companies
            .write()
            .map_err(|_| anyhow!("company store lock poisoned"))
    }
}

fn compare_text(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare(a: &Company, b: &Company, field: SortField) -> Ordering {
    match field {
        SortField::Name => compare_text(Some(&a.name), Some(&b.name)),
        SortField::Industry => compare_text(a.industry.as_deref(), b.industry.as_deref()),
        SortField::Country => compare_text(a.country.as_deref(), b.country.as_deref()),
        SortField::Region => compare_text(a.region.as_deref(), b.region.as_deref()),
        SortField::Size => compare_text(a.size.as_deref(), b.size.as_deref()),
        SortField::Locality => compare_text(a.locality.as_deref(), b.locality.as_deref()),
        SortField::Founded => match (a.founded, b.founded) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

#[async_trait]
impl CompanyStore for MemoryCompanyStore {
    async fn find(
        &self,
        predicate: &CompanyPredicate,
        sort: SortSpec,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Company>> {
        let mut matches: Vec<Company> = self
            .read()?
            .values()
            .filter(|c| predicate.matches(c))
            .cloned()
            .collect();

        // Insertion order for ties, so pages are stable between calls
        matches.sort_by_key(|c| c.id);
        matches.sort_by(|a, b| {
            let ordering = compare(a, b, sort.field);
            match sort.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let take = usize::try_from(take).unwrap_or(usize::MAX);
        Ok(matches.into_iter().skip(skip).take(take).collect())
    }

    async fn count(&self, predicate: &CompanyPredicate) -> Result<u64> {
        Ok(self.read()?.values().filter(|c| predicate.matches(c)).count() as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn save(&self, company: &Company) -> Result<()> {
        self.write()?.insert(company.id, company.clone());
        Ok(())
    }

    async fn insert_many(&self, companies: &[Company]) -> Result<u64> {
        let mut store = self.write()?;
        let mut inserted = 0;
        for company in companies {
            if !store.contains_key(&company.id) {
                store.insert(company.id, company.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

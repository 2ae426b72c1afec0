//! Query compiler
//!
//! Turns a [`FilterSet`] plus a page request into the predicate, sort and
//! window the record store understands. Text fields match as
//! case-insensitive substrings, `size` and `founded` match exactly, and
//! `product` is looked up in the stored summary text. Absent fields add no
//! condition, so an empty filter set matches every record.

use tracing::debug;

use super::error::Result;
use super::filters::{CompanySize, FilterSet, SortSpec};
use super::models::Company;
use super::store::CompanyStore;
use crate::common::{PageRequest, Paginated};

/// Company text columns that support substring matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Industry,
    Country,
    Region,
    Summary,
}

impl TextField {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Industry => "industry",
            Self::Country => "country",
            Self::Region => "region",
            Self::Summary => "ai_summary",
        }
    }

    pub fn value<'a>(&self, company: &'a Company) -> Option<&'a str> {
        match self {
            Self::Name => Some(company.name.as_str()),
            Self::Industry => company.industry.as_deref(),
            Self::Country => company.country.as_deref(),
            Self::Region => company.region.as_deref(),
            Self::Summary => company.ai_summary.as_deref(),
        }
    }
}

/// A single per-field condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Case-insensitive substring match; a missing value never matches.
    Contains { field: TextField, needle: String },
    SizeIs(CompanySize),
    FoundedIn(i32),
}

impl Condition {
    pub fn matches(&self, company: &Company) -> bool {
        match self {
            Self::Contains { field, needle } => field
                .value(company)
                .is_some_and(|value| value.to_lowercase().contains(&needle.to_lowercase())),
            Self::SizeIs(size) => company.size.as_deref() == Some(size.as_str()),
            Self::FoundedIn(year) => company.founded == Some(*year),
        }
    }
}

/// Logical AND of conditions. No conditions matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyPredicate {
    conditions: Vec<Condition>,
}

impl CompanyPredicate {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn matches(&self, company: &Company) -> bool {
        self.conditions.iter().all(|c| c.matches(company))
    }
}

/// Everything the store needs to produce one result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    pub predicate: CompanyPredicate,
    pub sort: SortSpec,
    pub skip: u64,
    pub take: u64,
}

pub fn compile(filters: &FilterSet, page: PageRequest) -> CompiledQuery {
    let text_fields = [
        (TextField::Name, &filters.name),
        (TextField::Industry, &filters.industry),
        (TextField::Country, &filters.country),
        (TextField::Region, &filters.region),
        (TextField::Summary, &filters.product),
    ];

    let mut predicate = CompanyPredicate::all();
    for (field, value) in text_fields {
        if let Some(needle) = value {
            predicate = predicate.and(Condition::Contains {
                field,
                needle: needle.clone(),
            });
        }
    }
    if let Some(size) = filters.size {
        predicate = predicate.and(Condition::SizeIs(size));
    }
    if let Some(year) = filters.founded {
        predicate = predicate.and(Condition::FoundedIn(year));
    }

    CompiledQuery {
        predicate,
        sort: filters.sort_or_default(),
        skip: page.skip(),
        take: page.take(),
    }
}

/// Run a filter set against the store and return one page.
///
/// The page and the total are fetched concurrently with the same predicate.
pub async fn search(
    store: &dyn CompanyStore,
    filters: &FilterSet,
    page: PageRequest,
) -> Result<Paginated<Company>> {
    let query = compile(filters, page);
    debug!(
        conditions = query.predicate.conditions().len(),
        skip = query.skip,
        take = query.take,
        "Searching companies"
    );

    let (companies, total) = tokio::try_join!(
        store.find(&query.predicate, query.sort, query.skip, query.take),
        store.count(&query.predicate),
    )?;

    Ok(Paginated::new(companies, total, page))
}

//! Offset-based pagination
//!
//! Pages are 1-based. `skip = (page - 1) * limit`, and `totalPages` is the
//! ceiling of `total / limit`. A page past the end is an empty page, never an
//! error.
//!
//! ```rust,ignore
//! let request = PageRequest::parse(Some("2"), Some("12"), &sizes)?;
//! let compiled = compile(&filters, request);
//! let (items, total) = store.find(..).await? / store.count(..).await?;
//! let page = Paginated::new(items, total, request);
//! ```

use std::num::NonZeroU32;

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

// ============================================================================
// Page sizes
// ============================================================================

/// Page size limits applied to caller-supplied `limit` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizeConfig {
    /// Used when the caller omits `limit`.
    pub default_limit: NonZeroU32,
    /// Larger requested limits are clamped to this.
    pub max_limit: NonZeroU32,
}

impl Default for PageSizeConfig {
    fn default() -> Self {
        Self {
            default_limit: NonZeroU32::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroU32::MIN),
            max_limit: NonZeroU32::new(MAX_PAGE_SIZE).unwrap_or(NonZeroU32::MIN),
        }
    }
}

// ============================================================================
// Page request
// ============================================================================

/// A validated page request (`page >= 1`, `limit > 0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: NonZeroU32,
    pub limit: NonZeroU32,
}

impl PageRequest {
    pub fn new(page: NonZeroU32, limit: NonZeroU32) -> Self {
        Self { page, limit }
    }

    /// Parse raw `page` / `limit` query values.
    ///
    /// Missing values fall back to page 1 and the configured default limit.
    /// Returns a caller-facing message when a value is present but not a
    /// positive integer.
    pub fn parse(
        page: Option<&str>,
        limit: Option<&str>,
        sizes: &PageSizeConfig,
    ) -> Result<Self, String> {
        let page = match non_blank(page) {
            Some(raw) => parse_positive(raw).ok_or_else(|| format!("Invalid page: {raw}"))?,
            None => NonZeroU32::MIN,
        };

        let limit = match non_blank(limit) {
            Some(raw) => parse_positive(raw)
                .ok_or_else(|| format!("Invalid limit: {raw}"))?
                .min(sizes.max_limit),
            None => sizes.default_limit,
        };

        Ok(Self { page, limit })
    }

    /// Number of records to skip.
    pub fn skip(&self) -> u64 {
        u64::from(self.page.get() - 1) * u64::from(self.limit.get())
    }

    /// Number of records to take.
    pub fn take(&self) -> u64 {
        u64::from(self.limit.get())
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_positive(raw: &str) -> Option<NonZeroU32> {
    raw.parse::<u32>().ok().and_then(NonZeroU32::new)
}

// ============================================================================
// Page metadata
// ============================================================================

/// Pagination block returned alongside a result page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(total: u64, request: PageRequest) -> Self {
        Self {
            total,
            page: request.page.get(),
            limit: request.limit.get(),
            total_pages: total.div_ceil(u64::from(request.limit.get())),
        }
    }
}

/// One page of results plus its pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            data,
            pagination: Pagination::new(total, request),
        }
    }
}

//! Filter, sort and page a catalog snapshot.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions, Strength};
use serde::Serialize;
use vs_core::{Error, Result};

use crate::entry::VideoEntry;

/// Sort order for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Display name, ascending.
    #[default]
    Name,
    /// Size in bytes, descending.
    Size,
    /// Modification time, descending.
    Date,
}

impl SortKey {
    /// Parse a `sort` parameter. Unknown values fall back to [`SortKey::Name`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "size" => Self::Size,
            "date" => Self::Date,
            _ => Self::Name,
        }
    }

    fn compare(self, names: &NameCollator, a: &VideoEntry, b: &VideoEntry) -> Ordering {
        match self {
            Self::Name => names.compare(&a.display_name, &b.display_name),
            Self::Size => b.size.cmp(&a.size),
            Self::Date => b.last_modified.cmp(&a.last_modified),
        }
    }
}

/// Root-locale collation at tertiary strength: accents sort next to their
/// base letter and, among names differing only in case, lower-case comes
/// first.
struct NameCollator {
    collator: Option<Collator>,
}

impl NameCollator {
    fn new() -> Self {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Tertiary);
        let collator = match Collator::try_new(&Default::default(), options) {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::warn!(error = ?e, "Collator unavailable, falling back to case-folded order");
                None
            }
        };
        Self { collator }
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(c) => c.compare(a, b),
            None => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| b.cmp(a)),
        }
    }
}

/// Validated listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub sort: SortKey,
    pub search: Option<String>,
    pub content_generated: Option<bool>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 24,
            sort: SortKey::Name,
            search: None,
            content_generated: None,
        }
    }
}

impl ListQuery {
    /// Reject out-of-range paging before any directory I/O.
    pub fn validate(&self, max_limit: u32) -> Result<()> {
        if self.limit < 1 || self.limit > max_limit {
            return Err(Error::InvalidQuery(format!(
                "Limit must be between 1 and {max_limit}"
            )));
        }
        if self.page < 1 {
            return Err(Error::InvalidQuery("Page must be >= 1".into()));
        }
        Ok(())
    }

    /// Filter, sort and slice `entries`.
    ///
    /// `total` and the page both come from the same `entries` snapshot.
    pub fn apply(&self, mut entries: Vec<VideoEntry>) -> Page {
        if let Some(flag) = self.content_generated {
            entries.retain(|e| e.content_generated == flag);
        }
        if let Some(needle) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = needle.to_lowercase();
            entries.retain(|e| e.matches(&needle));
        }

        let sort = self.sort;
        let names = NameCollator::new();
        entries.sort_by(|a, b| sort.compare(&names, a, b));

        let pagination = Pagination::new(entries.len(), self.page, self.limit);
        let offset = (self.page as usize - 1).saturating_mul(self.limit as usize);
        let videos = entries
            .into_iter()
            .skip(offset)
            .take(self.limit as usize)
            .collect();

        Page { videos, pagination }
    }
}

/// Paging metadata returned with every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(total: usize, page: u32, limit: u32) -> Self {
        let limit_n = limit.max(1) as usize;
        let total_pages = total.div_ceil(limit_n);
        Self {
            total,
            page,
            limit,
            total_pages,
            has_next: (page as usize) < total_pages,
            has_prev: page > 1,
        }
    }
}

/// One page of entries.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub videos: Vec<VideoEntry>,
    pub pagination: Pagination,
}

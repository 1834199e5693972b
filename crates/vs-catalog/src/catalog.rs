//! Catalog builder: scan, filter to video files, join overlay records.

use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

use serde::Serialize;
use vs_core::config::Config;
use vs_core::{format_file_size, is_safe_filename, Error, Result};

use crate::entry::VideoEntry;
use crate::extractor::{extract, supported_extension};
use crate::overlay::OverlayStore;
use crate::query::{ListQuery, Page, SortKey};
use crate::source::MediaSource;

/// Listing-related limits taken from configuration.
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub extensions: Vec<String>,
    pub public_prefix: String,
    pub max_limit: u32,
    pub search_default_limit: u32,
}

impl CatalogSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            extensions: config.normalized_extensions(),
            public_prefix: config.library.public_prefix.clone(),
            max_limit: config.listing.max_limit,
            search_default_limit: config.listing.search_default_limit,
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Result of a search request.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub videos: Vec<VideoEntry>,
    /// Matches before the limit was applied.
    pub total: usize,
}

/// Aggregate numbers over the supported files in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_files: usize,
    pub total_size: u64,
    pub total_size_formatted: String,
    pub type_count: BTreeMap<String, usize>,
}

/// The video catalog over one directory.
///
/// Every call rescans; nothing is cached between requests.
#[derive(Clone)]
pub struct Catalog {
    source: Arc<dyn MediaSource>,
    overlay: OverlayStore,
    settings: CatalogSettings,
}

impl Catalog {
    pub fn new(source: Arc<dyn MediaSource>, overlay: OverlayStore, settings: CatalogSettings) -> Self {
        Self {
            source,
            overlay,
            settings,
        }
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    pub fn overlay(&self) -> &OverlayStore {
        &self.overlay
    }

    pub fn source(&self) -> &Arc<dyn MediaSource> {
        &self.source
    }

    /// Build every entry in the directory.
    ///
    /// Files that fail to stat or are not regular files are skipped.
    pub async fn list(&self) -> Result<Vec<VideoEntry>> {
        let names = self.source.list().await?;
        let mut entries = Vec::with_capacity(names.len());

        for name in names {
            if supported_extension(&name, &self.settings.extensions).is_err() {
                continue;
            }
            let stat = match self.source.stat(&name).await {
                Ok(stat) => stat,
                Err(e) => {
                    tracing::debug!(filename = %name, error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !stat.is_file {
                continue;
            }

            let overlay = self.overlay.get(&name);
            match extract(
                &name,
                &stat,
                overlay,
                &self.settings.extensions,
                &self.settings.public_prefix,
            ) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::debug!(filename = %name, error = %e, "Skipping entry"),
            }
        }

        Ok(entries)
    }

    /// Build the entry for a single file.
    pub async fn get_one(&self, filename: &str) -> Result<VideoEntry> {
        supported_extension(filename, &self.settings.extensions)?;
        if !is_safe_filename(filename) {
            return Err(Error::not_found("video", filename));
        }

        let stat = self.source.stat(filename).await.map_err(|e| {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::debug!(filename = %filename, error = %e, "Stat failed");
            }
            Error::not_found("video", filename)
        })?;

        let overlay = self.overlay.get(filename);
        extract(
            filename,
            &stat,
            overlay,
            &self.settings.extensions,
            &self.settings.public_prefix,
        )
    }

    /// Filter, sort and page the directory contents.
    ///
    /// Paging parameters are validated before the directory is touched.
    pub async fn query(&self, query: &ListQuery) -> Result<Page> {
        query.validate(self.settings.max_limit)?;
        let entries = self.list().await?;
        Ok(query.apply(entries))
    }

    /// Name-sorted first page of entries matching `query`.
    pub async fn search(&self, query: &str, limit: Option<u32>) -> Result<SearchResults> {
        if query.is_empty() {
            return Err(Error::InvalidQuery("Invalid search query".into()));
        }

        let list_query = ListQuery {
            page: 1,
            limit: limit.unwrap_or(self.settings.search_default_limit),
            sort: SortKey::Name,
            search: Some(query.to_string()),
            content_generated: None,
        };
        let page = self.query(&list_query).await?;

        Ok(SearchResults {
            query: query.to_string(),
            total: page.pagination.total,
            videos: page.videos,
        })
    }

    /// Count and size totals. Overlay records are not consulted.
    pub async fn stats(&self) -> Result<CatalogStats> {
        let names = self.source.list().await?;
        let mut stats = CatalogStats {
            total_files: 0,
            total_size: 0,
            total_size_formatted: String::new(),
            type_count: BTreeMap::new(),
        };

        for name in names {
            let Ok(ext) = supported_extension(&name, &self.settings.extensions) else {
                continue;
            };
            match self.source.stat(&name).await {
                Ok(stat) if stat.is_file => {
                    stats.total_files += 1;
                    stats.total_size += stat.size;
                    *stats.type_count.entry(ext).or_insert(0) += 1;
                }
                Ok(_) => {}
                Err(e) => tracing::debug!(filename = %name, error = %e, "Skipping unreadable entry"),
            }
        }

        stats.total_size_formatted = format_file_size(stats.total_size);
        Ok(stats)
    }

    /// Entries without generated content, newest first, optionally capped.
    pub async fn newly_added(&self, quantity: Option<usize>) -> Result<Vec<VideoEntry>> {
        let mut entries = self.list().await?;
        entries.retain(|e| !e.content_generated);
        entries.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        if let Some(n) = quantity {
            entries.truncate(n);
        }
        Ok(entries)
    }
}

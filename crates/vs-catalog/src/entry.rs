//! The derived, per-file catalog entry.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// One video file as exposed by listing, search and lookup.
///
/// Entries are rebuilt on every scan and never persisted. Overlay fields are a
/// snapshot taken when the entry was built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoEntry {
    pub id: String,
    pub filename: String,
    pub display_name: String,
    pub size: u64,
    pub size_formatted: String,
    pub mime_type: String,
    pub extension: String,
    pub last_modified: DateTime<Utc>,
    pub url: String,
    pub content_generated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
    /// Creation time (or mtime) used to order newly-added listings.
    #[serde(skip)]
    pub added_at: DateTime<Utc>,
}

impl VideoEntry {
    /// Case-insensitive substring match over display name and title.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        self.display_name.to_lowercase().contains(needle)
            || self
                .title
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(needle))
    }
}

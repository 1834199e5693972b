//! Overlay record types.
//!
//! [`OverlayRecord`] maps to a `video_content` row and implements `from_row`
//! for constructing itself from a `rusqlite::Row`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Externally generated enrichment for one filename.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayRecord {
    pub filename: String,
    pub content_generated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl OverlayRecord {
    /// The zero-value record returned for filenames never enriched.
    pub fn empty(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    /// Columns, in order, expected by [`OverlayRecord::from_row`].
    pub const COLUMNS: &'static str =
        "filename, content_generated, title, description, meta, created_at, updated_at";

    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        let meta_text: Option<String> = row.get(4)?;
        let meta = match meta_text {
            Some(text) => serde_json::from_str::<Map<String, Value>>(&text).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    4,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?,
            None => Map::new(),
        };

        Ok(Self {
            filename: row.get(0)?,
            content_generated: row.get(1)?,
            title: row.get::<_, Option<String>>(2)?.filter(|t| !t.is_empty()),
            description: row.get::<_, Option<String>>(3)?.filter(|d| !d.is_empty()),
            meta: Some(meta),
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    /// Merge `patch` into this record, leaving absent fields untouched.
    pub fn apply(&mut self, patch: &OverlayPatch) {
        if let Some(ref title) = patch.title {
            self.title = Some(title.clone());
        }
        if let Some(ref description) = patch.description {
            self.description = Some(description.clone());
        }
        if let Some(ref meta) = patch.meta {
            self.meta = Some(meta.clone());
        }
        if let Some(generated) = patch.content_generated {
            self.content_generated = generated;
        }
    }
}

/// Partial overlay update. `None` fields are not written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayPatch {
    pub content_generated: Option<bool>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub meta: Option<Map<String, Value>>,
}

impl OverlayPatch {
    pub fn is_empty(&self) -> bool {
        self.content_generated.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.meta.is_none()
    }
}

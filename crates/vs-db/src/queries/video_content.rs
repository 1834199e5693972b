//! Overlay row lookup and field-merging upsert.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use vs_core::{Error, Result};

use crate::models::{OverlayPatch, OverlayRecord};

/// Fetch the overlay row for `filename`, if any.
pub fn get_content(conn: &Connection, filename: &str) -> Result<Option<OverlayRecord>> {
    let q = format!(
        "SELECT {} FROM video_content WHERE filename = ?1",
        OverlayRecord::COLUMNS
    );
    conn.query_row(&q, [filename], OverlayRecord::from_row)
        .optional()
        .map_err(|e| Error::database(e.to_string()))
}

/// Insert or merge an overlay row.
///
/// Fields absent from `patch` keep their stored value. A new row starts
/// with `content_generated = 0` unless the patch says otherwise. An empty
/// patch writes nothing and returns the current record.
pub fn upsert_content(
    conn: &Connection,
    filename: &str,
    patch: &OverlayPatch,
) -> Result<OverlayRecord> {
    if patch.is_empty() {
        return Ok(get_content(conn, filename)?.unwrap_or_else(|| OverlayRecord::empty(filename)));
    }

    let now = Utc::now().to_rfc3339();
    let meta = patch
        .meta
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| Error::Internal(format!("meta serialization: {e}")))?;

    conn.execute(
        "INSERT INTO video_content
            (filename, content_generated, title, description, meta, created_at, updated_at)
         VALUES (?1, COALESCE(?2, 0), ?3, ?4, ?5, ?6, ?6)
         ON CONFLICT(filename) DO UPDATE SET
            content_generated = COALESCE(?2, video_content.content_generated),
            title             = COALESCE(?3, video_content.title),
            description       = COALESCE(?4, video_content.description),
            meta              = COALESCE(?5, video_content.meta),
            updated_at        = ?6",
        rusqlite::params![
            filename,
            patch.content_generated,
            patch.title,
            patch.description,
            meta,
            &now,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    get_content(conn, filename)?
        .ok_or_else(|| Error::Internal(format!("overlay row for {filename} vanished after upsert")))
}

/// Number of rows with `content_generated = 1`.
pub fn count_generated(conn: &Connection) -> Result<u64> {
    conn.query_row(
        "SELECT COUNT(*) FROM video_content WHERE content_generated = 1",
        [],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(|e| Error::database(e.to_string()))
}

//! The [`OverlayBackend`] trait and its SQLite and in-memory implementations.
//!
//! Backends are synchronous; callers on an async runtime are expected to keep
//! calls short (SQLite in WAL mode with a small pool, or a `DashMap`).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use vs_core::config::{OverlayBackendKind, OverlayConfig};
use vs_core::{Error, Result};

use crate::migrations;
use crate::models::{OverlayPatch, OverlayRecord};
use crate::queries::video_content;

/// Keyed store of overlay records.
pub trait OverlayBackend: Send + Sync {
    /// Short name used in logs (e.g. "sqlite").
    fn name(&self) -> &'static str;

    /// Look up the record for `filename`.
    fn fetch(&self, filename: &str) -> Result<Option<OverlayRecord>>;

    /// Merge `patch` into the record for `filename`, creating it if absent.
    fn upsert(&self, filename: &str, patch: &OverlayPatch) -> Result<OverlayRecord>;

    /// Number of records flagged as generated.
    fn generated_count(&self) -> Result<u64>;
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

/// Overlay records persisted in the `video_content` table.
///
/// Every connection the pool hands out points at the same database and the
/// schema is migrated once, when the backend is built.
#[derive(Clone)]
pub struct SqliteOverlayBackend {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteOverlayBackend {
    /// Open (or create) the overlay database file at `path`.
    ///
    /// Readers never block the single writer (WAL), and a writer that finds
    /// the file locked waits up to five seconds before failing.
    pub fn open(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA busy_timeout = 5000;",
            )
        });
        Self::build(manager, 4)
    }

    /// Private in-memory overlay database.
    ///
    /// Named shared-cache URIs keep pooled connections on one database while
    /// separate backends stay isolated.
    pub fn in_memory() -> Result<Self> {
        static NEXT_DB: AtomicU64 = AtomicU64::new(0);
        let n = NEXT_DB.fetch_add(1, Ordering::Relaxed);
        let manager =
            SqliteConnectionManager::file(format!("file:overlay_mem_{n}?mode=memory&cache=shared"));
        Self::build(manager, 2)
    }

    fn build(manager: SqliteConnectionManager, max_size: u32) -> Result<Self> {
        let pool = Pool::builder()
            .max_size(max_size)
            .build(manager)
            .map_err(|e| Error::database(format!("overlay pool: {e}")))?;
        let backend = Self { pool };
        let conn = backend.conn()?;
        migrations::run_migrations(&conn)?;
        Ok(backend)
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| Error::database(format!("overlay connection: {e}")))
    }
}

impl OverlayBackend for SqliteOverlayBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn fetch(&self, filename: &str) -> Result<Option<OverlayRecord>> {
        let conn = self.conn()?;
        video_content::get_content(&conn, filename)
    }

    fn upsert(&self, filename: &str, patch: &OverlayPatch) -> Result<OverlayRecord> {
        let conn = self.conn()?;
        video_content::upsert_content(&conn, filename, patch)
    }

    fn generated_count(&self) -> Result<u64> {
        let conn = self.conn()?;
        video_content::count_generated(&conn)
    }
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

/// Process-local overlay store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryOverlayBackend {
    records: DashMap<String, OverlayRecord>,
}

impl MemoryOverlayBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverlayBackend for MemoryOverlayBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn fetch(&self, filename: &str) -> Result<Option<OverlayRecord>> {
        Ok(self.records.get(filename).map(|r| r.value().clone()))
    }

    fn upsert(&self, filename: &str, patch: &OverlayPatch) -> Result<OverlayRecord> {
        if patch.is_empty() {
            return Ok(self
                .fetch(filename)?
                .unwrap_or_else(|| OverlayRecord::empty(filename)));
        }
        let now = Utc::now().to_rfc3339();
        let mut entry = self.records.entry(filename.to_string()).or_insert_with(|| {
            let mut rec = OverlayRecord::empty(filename);
            rec.meta = Some(Default::default());
            rec.created_at = Some(now.clone());
            rec
        });
        entry.apply(patch);
        entry.updated_at = Some(now);
        Ok(entry.clone())
    }

    fn generated_count(&self) -> Result<u64> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.value().content_generated)
            .count() as u64)
    }
}

// ---------------------------------------------------------------------------
// Construction from config
// ---------------------------------------------------------------------------

/// Build the backend selected by `config`.
///
/// For SQLite the database directory is created when missing.
pub fn open_backend(config: &OverlayConfig) -> Result<Arc<dyn OverlayBackend>> {
    match config.backend {
        OverlayBackendKind::Memory => {
            tracing::info!("Overlay store: in-memory");
            Ok(Arc::new(MemoryOverlayBackend::new()))
        }
        OverlayBackendKind::Sqlite => {
            let db_path = &config.db_path;
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                    tracing::info!("Created overlay database directory {}", parent.display());
                }
            }
            let existed = db_path.exists();
            let db_str = db_path.to_string_lossy();
            let backend = SqliteOverlayBackend::open(&db_str)?;
            if existed {
                tracing::info!("Overlay database opened (existing) at {db_str}");
            } else {
                tracing::info!("Overlay database created (new) at {db_str}");
            }
            Ok(Arc::new(backend))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn open_backend_memory() {
        let cfg = OverlayConfig {
            backend: OverlayBackendKind::Memory,
            db_path: PathBuf::from("/unused"),
        };
        assert_eq!(open_backend(&cfg).unwrap().name(), "memory");
    }

    #[test]
    fn open_backend_sqlite_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = OverlayConfig {
            backend: OverlayBackendKind::Sqlite,
            db_path: dir.path().join("nested/overlay.db"),
        };
        let backend = open_backend(&cfg).unwrap();
        assert_eq!(backend.name(), "sqlite");
        assert!(cfg.db_path.exists());
    }

    fn backends() -> Vec<Box<dyn OverlayBackend>> {
        vec![
            Box::new(SqliteOverlayBackend::in_memory().unwrap()),
            Box::new(MemoryOverlayBackend::new()),
        ]
    }

    #[test]
    fn fetch_unknown_is_none() {
        for b in backends() {
            assert!(b.fetch("ghost.mp4").unwrap().is_none(), "{}", b.name());
        }
    }

    #[test]
    fn upsert_then_fetch() {
        for b in backends() {
            b.upsert(
                "a.mp4",
                &OverlayPatch {
                    content_generated: Some(true),
                    title: Some("A".into()),
                    ..Default::default()
                },
            )
            .unwrap();
            let rec = b.fetch("a.mp4").unwrap().unwrap();
            assert!(rec.content_generated, "{}", b.name());
            assert_eq!(rec.title.as_deref(), Some("A"));
            assert_eq!(b.generated_count().unwrap(), 1);
        }
    }

    #[test]
    fn partial_updates_merge() {
        for b in backends() {
            b.upsert(
                "a.mp4",
                &OverlayPatch {
                    title: Some("A".into()),
                    ..Default::default()
                },
            )
            .unwrap();
            let rec = b
                .upsert(
                    "a.mp4",
                    &OverlayPatch {
                        description: Some("B".into()),
                        ..Default::default()
                    },
                )
                .unwrap();
            assert_eq!(rec.title.as_deref(), Some("A"), "{}", b.name());
            assert_eq!(rec.description.as_deref(), Some("B"), "{}", b.name());
            assert!(!rec.content_generated);
        }
    }

    #[test]
    fn empty_patch_writes_nothing() {
        for b in backends() {
            let rec = b.upsert("ghost.mp4", &OverlayPatch::default()).unwrap();
            assert_eq!(rec, OverlayRecord::empty("ghost.mp4"), "{}", b.name());
            assert!(b.fetch("ghost.mp4").unwrap().is_none(), "{}", b.name());

            let stored = b
                .upsert(
                    "a.mp4",
                    &OverlayPatch {
                        title: Some("A".into()),
                        ..Default::default()
                    },
                )
                .unwrap();
            let again = b.upsert("a.mp4", &OverlayPatch::default()).unwrap();
            assert_eq!(again, stored, "{}", b.name());
        }
    }

    #[test]
    fn in_memory_backends_are_isolated() {
        let a = SqliteOverlayBackend::in_memory().unwrap();
        let b = SqliteOverlayBackend::in_memory().unwrap();
        a.upsert(
            "a.mp4",
            &OverlayPatch {
                content_generated: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(a.generated_count().unwrap(), 1);
        assert_eq!(b.generated_count().unwrap(), 0);
    }

    #[test]
    fn migrations_are_idempotent_on_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.db");
        let path = path.to_string_lossy();
        SqliteOverlayBackend::open(&path).unwrap();
        let b = SqliteOverlayBackend::open(&path).unwrap();
        assert!(b.fetch("any.mp4").unwrap().is_none());
    }

    #[test]
    fn sqlite_backend_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.db");
        let path = path.to_string_lossy();

        {
            let b = SqliteOverlayBackend::open(&path).unwrap();
            b.upsert(
                "keep.mp4",
                &OverlayPatch {
                    content_generated: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        let b = SqliteOverlayBackend::open(&path).unwrap();
        assert!(b.fetch("keep.mp4").unwrap().unwrap().content_generated);
    }
}

//! Narrow filesystem capability: list, stat, open.
//!
//! Nothing here caches. Every call goes to the directory, which is the only
//! source of truth for what the catalog contains.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use vs_core::{is_safe_filename, Error, Result};

/// The subset of a filesystem stat record the catalog needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
    pub modified: DateTime<Utc>,
    /// Birth time, where the platform reports one.
    pub created: Option<DateTime<Utc>>,
    pub is_file: bool,
}

impl FileStat {
    /// Creation time, falling back to modification time.
    pub fn added_at(&self) -> DateTime<Utc> {
        self.created.unwrap_or(self.modified)
    }

    fn from_metadata(meta: &std::fs::Metadata) -> io::Result<Self> {
        Ok(Self {
            size: meta.len(),
            modified: meta.modified()?.into(),
            created: meta.created().ok().map(DateTime::<Utc>::from),
            is_file: meta.is_file(),
        })
    }
}

/// Read-only access to a directory of media files.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// The directory being served.
    fn root(&self) -> &Path;

    /// Enumerate entry names in a deterministic order.
    async fn list(&self) -> Result<Vec<String>>;

    /// Stat a single entry by name.
    async fn stat(&self, filename: &str) -> io::Result<FileStat>;

    /// Open a single entry for reading.
    async fn open(&self, filename: &str) -> io::Result<tokio::fs::File>;
}

/// A [`MediaSource`] over a local directory.
#[derive(Debug, Clone)]
pub struct LocalDirectory {
    root: PathBuf,
}

impl LocalDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `filename` inside the root, refusing anything that is not a
    /// single normal path component.
    fn path_for(&self, filename: &str) -> io::Result<PathBuf> {
        if !is_safe_filename(filename) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("refusing unsafe filename {filename:?}"),
            ));
        }
        Ok(self.root.join(filename))
    }
}

#[async_trait]
impl MediaSource for LocalDirectory {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut dir = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| Error::directory_unavailable(self.root.display(), e))?;

        let mut names = Vec::new();
        loop {
            match dir.next_entry().await {
                Ok(Some(entry)) => match entry.file_name().into_string() {
                    Ok(name) => names.push(name),
                    Err(raw) => {
                        tracing::debug!(name = ?raw, "Skipping non-UTF-8 directory entry");
                    }
                },
                Ok(None) => break,
                Err(e) => return Err(Error::directory_unavailable(self.root.display(), e)),
            }
        }

        names.sort();
        Ok(names)
    }

    async fn stat(&self, filename: &str) -> io::Result<FileStat> {
        let path = self.path_for(filename)?;
        let meta = tokio::fs::metadata(&path).await?;
        FileStat::from_metadata(&meta)
    }

    async fn open(&self, filename: &str) -> io::Result<tokio::fs::File> {
        let path = self.path_for(filename)?;
        tokio::fs::File::open(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn list_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.mp4", "a.mp4", "b.mkv"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let src = LocalDirectory::new(dir.path());
        assert_eq!(src.list().await.unwrap(), vec!["a.mp4", "b.mkv", "c.mp4"]);
    }

    #[tokio::test]
    async fn list_missing_directory_is_unavailable() {
        let src = LocalDirectory::new("/definitely/not/a/dir");
        let err = src.list().await.unwrap_err();
        assert!(matches!(err, Error::DirectoryUnavailable { .. }));
    }

    #[tokio::test]
    async fn stat_reports_size_and_kind() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.mp4"), vec![0u8; 42]).unwrap();
        std::fs::create_dir(dir.path().join("sub.mp4")).unwrap();

        let src = LocalDirectory::new(dir.path());
        let st = src.stat("a.mp4").await.unwrap();
        assert_eq!(st.size, 42);
        assert!(st.is_file);
        assert!(!src.stat("sub.mp4").await.unwrap().is_file);
    }

    #[tokio::test]
    async fn traversal_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let src = LocalDirectory::new(dir.path());
        let err = src.stat("../etc/passwd").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(src.open("..").await.is_err());
    }
}

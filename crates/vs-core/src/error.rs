//! Unified error type for vidshelf.
//!
//! All crates funnel their failures into [`Error`], which carries enough context
//! for API handlers to derive an HTTP status code via [`Error::http_status`].

use std::fmt;

/// Unified error type covering all failure modes in vidshelf.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The video directory could not be enumerated.
    #[error("Video directory unavailable: {path}: {source}")]
    DirectoryUnavailable {
        /// The directory that was scanned.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The filename's extension is not a supported video type.
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "video", "thumbnail").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// A `Range` header was malformed or outside the file bounds.
    #[error("Range not satisfiable for file of {file_size} bytes")]
    InvalidRange {
        /// Size of the file the range was evaluated against.
        file_size: u64,
    },

    /// Query parameters failed validation.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// An overlay upsert did not reach the backing store.
    #[error("Storage write failed: {0}")]
    StorageWriteFailed(String),

    /// A database operation failed.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The configuration file could not be parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::DirectoryUnavailable { .. } => 500,
            Error::UnsupportedType(_) => 404,
            Error::NotFound { .. } => 404,
            Error::InvalidRange { .. } => 416,
            Error::InvalidQuery(_) => 400,
            Error::StorageWriteFailed(_) => 500,
            Error::Database { .. } => 500,
            Error::Io { .. } => 500,
            Error::Config(_) => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }

    /// Convenience constructor for [`Error::DirectoryUnavailable`].
    pub fn directory_unavailable(path: impl fmt::Display, source: std::io::Error) -> Self {
        Error::DirectoryUnavailable {
            path: path.to_string(),
            source,
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries all
//! sub-configs for the server, video library, listing limits, overlay store
//! and streaming. Every section defaults sensibly so a completely empty `{}`
//! file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::media::{normalize_extension, VIDEO_EXTENSIONS};
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub library: LibraryConfig,
    pub listing: ListingConfig,
    pub overlay: OverlayConfig,
    pub streaming: StreamingConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Config(format!("parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Apply environment overrides on top of file/default values.
    ///
    /// `VIDEO_DIRECTORY` takes precedence over `VIDEOS_DIR`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("VIDEO_DIRECTORY").or_else(|| lookup("VIDEOS_DIR")) {
            if !dir.is_empty() {
                self.library.video_dir = PathBuf::from(dir);
            }
        }
        if let Some(host) = lookup("VIDSHELF_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("VIDSHELF_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!("Ignoring invalid VIDSHELF_PORT value {port:?}"),
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if !self.library.video_dir.is_dir() {
            warnings.push(format!(
                "library.video_dir {} is not a readable directory",
                self.library.video_dir.display()
            ));
        }

        if self.library.extensions.is_empty() {
            warnings.push("library.extensions is empty; no files will be listed".into());
        }

        if self.listing.max_limit == 0 {
            warnings.push("listing.max_limit is 0; every listing request will be rejected".into());
        }
        if self.listing.default_limit == 0 || self.listing.default_limit > self.listing.max_limit {
            warnings.push(format!(
                "listing.default_limit {} is outside 1..={}",
                self.listing.default_limit, self.listing.max_limit
            ));
        }

        if self.overlay.backend == OverlayBackendKind::Memory {
            warnings.push("overlay.backend is memory; generated content is lost on restart".into());
        }

        warnings
    }

    /// Supported extensions normalized to lower-case with a leading dot.
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.library
            .extensions
            .iter()
            .map(|e| normalize_extension(e))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

/// Video directory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directory scanned on every catalog request.
    pub video_dir: PathBuf,
    /// Extensions treated as video files.
    pub extensions: Vec<String>,
    /// Path prefix used to build each entry's public `url`.
    pub public_prefix: String,
    /// Subdirectory of `video_dir` holding `<filename>.jpg` thumbnails.
    pub thumbnails_subdir: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            video_dir: PathBuf::from("./videos"),
            extensions: VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            public_prefix: "/videos".into(),
            thumbnails_subdir: "thumbnails".into(),
        }
    }
}

/// Pagination limits for listing and search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub default_limit: u32,
    pub max_limit: u32,
    pub search_default_limit: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_limit: 24,
            max_limit: 100,
            search_default_limit: 50,
        }
    }
}

/// Which overlay backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayBackendKind {
    #[default]
    Sqlite,
    Memory,
}

/// Overlay store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub backend: OverlayBackendKind,
    pub db_path: PathBuf,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            backend: OverlayBackendKind::Sqlite,
            db_path: PathBuf::from("./data/vidshelf.db"),
        }
    }
}

/// Byte-stream response settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// `Cache-Control` value sent with media responses.
    pub cache_control: String,
    /// Read buffer size for streamed bodies.
    pub chunk_size: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            cache_control: "public, max-age=3600".into(),
            chunk_size: 64 * 1024,
        }
    }
}

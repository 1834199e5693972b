//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates a temporary video directory, an
//! in-memory SQLite overlay store and a full [`AppContext`]. The
//! [`TestHarness::with_server`] constructor starts Axum on a random port for
//! HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use vs_core::config::Config;
use vs_db::SqliteOverlayBackend;
use vs_server::context::AppContext;
use vs_server::router::build_router;

/// Test harness wrapping a fully-constructed [`AppContext`] over a temp
/// directory.
pub struct TestHarness {
    pub ctx: AppContext,
    pub dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration and an empty directory.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration. The video directory
    /// is always replaced with a fresh temp dir.
    pub fn with_config(mut config: Config) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        config.library.video_dir = dir.path().to_path_buf();

        let backend = SqliteOverlayBackend::in_memory().expect("failed to create overlay db");
        let ctx = AppContext::from_config(config, Arc::new(backend));

        Self { ctx, dir }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let app = build_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Write a file into the video directory.
    pub fn write_file(&self, name: &str, data: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, data).expect("failed to write fixture file");
        path
    }

    /// Write a video of `len` bytes with a recognizable byte pattern.
    pub fn write_video(&self, name: &str, len: usize) -> Vec<u8> {
        let data = pattern(len);
        self.write_file(name, &data);
        data
    }
}

/// Deterministic non-repeating-ish byte pattern.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

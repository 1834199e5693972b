//! Application context shared by every route handler via Axum state.
//!
//! [`AppContext`] is cheap to clone: everything inside is an `Arc` or a
//! handle that wraps one.

use std::sync::Arc;

use vs_catalog::{Catalog, CatalogSettings, Generator, LocalDirectory, MediaSource, OverlayStore};
use vs_core::config::Config;
use vs_db::OverlayBackend;

use crate::active_streams::ActiveStreams;

/// Central state handed to every handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub catalog: Catalog,
    pub generator: Generator,
    pub active_streams: ActiveStreams,
}

impl AppContext {
    /// Wire the catalog, generator and stream accounting around a media source
    /// and an overlay backend.
    pub fn new(
        config: Config,
        source: Arc<dyn MediaSource>,
        backend: Arc<dyn OverlayBackend>,
    ) -> Self {
        let catalog = Catalog::new(
            source,
            OverlayStore::new(backend),
            CatalogSettings::from_config(&config),
        );
        Self {
            generator: Generator::new(catalog.clone()),
            catalog,
            config: Arc::new(config),
            active_streams: ActiveStreams::default(),
        }
    }

    /// Context over the configured local video directory.
    pub fn from_config(config: Config, backend: Arc<dyn OverlayBackend>) -> Self {
        let source = Arc::new(LocalDirectory::new(config.library.video_dir.clone()));
        Self::new(config, source, backend)
    }

    pub fn source(&self) -> &Arc<dyn MediaSource> {
        self.catalog.source()
    }
}

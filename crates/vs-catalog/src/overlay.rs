//! Fail-open read / surfaced-write wrapper around an [`OverlayBackend`].

use std::sync::Arc;

use vs_core::{Error, Result};
use vs_db::{OverlayBackend, OverlayPatch, OverlayRecord};

/// Overlay access as seen by the catalog.
#[derive(Clone)]
pub struct OverlayStore {
    backend: Arc<dyn OverlayBackend>,
}

impl OverlayStore {
    pub fn new(backend: Arc<dyn OverlayBackend>) -> Self {
        Self { backend }
    }

    /// Read the record for `filename`.
    ///
    /// A miss and a backend failure both yield the zero-value record.
    pub fn get(&self, filename: &str) -> OverlayRecord {
        match self.backend.fetch(filename) {
            Ok(Some(rec)) => rec,
            Ok(None) => OverlayRecord::empty(filename),
            Err(e) => {
                tracing::warn!(
                    filename = %filename,
                    backend = self.backend.name(),
                    error = %e,
                    "Overlay read failed; using empty record"
                );
                OverlayRecord::empty(filename)
            }
        }
    }

    /// Merge `patch` into the record for `filename`.
    pub fn set(&self, filename: &str, patch: &OverlayPatch) -> Result<OverlayRecord> {
        self.backend
            .upsert(filename, patch)
            .map_err(|e| Error::StorageWriteFailed(format!("{filename}: {e}")))
    }

    /// Count of generated records, or `None` if the backend is unreachable.
    pub fn generated_count(&self) -> Option<u64> {
        self.backend.generated_count().ok()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}

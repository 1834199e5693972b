//! vs-core: shared errors, configuration, and media-domain helpers.
//!
//! This crate is the foundational dependency for all other vs-* crates,
//! providing the unified error type, application configuration, and the
//! static extension/MIME tables and formatting helpers used when deriving
//! catalog entries.

pub mod config;
pub mod error;
pub mod media;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use media::*;

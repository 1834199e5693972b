//! vs-db: overlay persistence layer.
//!
//! This crate provides SQLite-backed storage for overlay records (a pooled
//! database migrated on open), an in-memory equivalent for
//! tests, and the [`backend::OverlayBackend`] trait both implement.

pub mod backend;
pub mod migrations;
pub mod models;
pub mod queries;

pub use backend::{open_backend, MemoryOverlayBackend, OverlayBackend, SqliteOverlayBackend};
pub use models::{OverlayPatch, OverlayRecord};

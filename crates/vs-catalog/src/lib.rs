//! vs-catalog: the video catalog over a local directory.
//!
//! - [`source`]: list / stat / open over the video directory
//! - [`extractor`]: per-file entry derivation
//! - [`overlay`]: fail-open overlay reads, surfaced writes
//! - [`catalog`]: scan + join, lookup, search, stats, newly-added
//! - [`query`]: filter, stable sort and pagination
//! - [`generation`]: sequential content generation

pub mod catalog;
pub mod entry;
pub mod extractor;
pub mod generation;
pub mod overlay;
pub mod query;
pub mod source;

pub use catalog::{Catalog, CatalogSettings, CatalogStats, SearchResults};
pub use entry::VideoEntry;
pub use generation::{GenerationResult, Generator};
pub use overlay::OverlayStore;
pub use query::{ListQuery, Page, Pagination, SortKey};
pub use source::{FileStat, LocalDirectory, MediaSource};

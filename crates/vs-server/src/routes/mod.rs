//! Route handlers for the HTTP API.

pub mod generate;
pub mod health;
pub mod metrics;
pub mod stream;
pub mod streaming_helpers;
pub mod thumbnails;
pub mod videos;

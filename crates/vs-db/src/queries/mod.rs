//! Database query modules.

pub mod video_content;

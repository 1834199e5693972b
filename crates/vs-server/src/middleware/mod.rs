//! HTTP middleware: request ID and response security headers.

pub mod request_id;
pub mod security;

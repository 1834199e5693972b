//! Shared streaming helpers: strict range parsing and chunked file serving
//! via `ReaderStream`.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use vs_catalog::FileStat;
use vs_core::{extension_of, http_date, is_safe_filename, mime_for_extension, Error};

use crate::active_streams::GuardedStream;
use crate::context::AppContext;

/// An inclusive byte window within a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes in the window.
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Parse a `Range: bytes=START-END` header value against `file_size`.
///
/// `END` defaults to the last byte. Suffix ranges, multiple ranges, other
/// units and anything outside `0..file_size` are rejected, never clamped.
pub fn parse_range(value: &str, file_size: u64) -> Result<ByteRange, Error> {
    let invalid = || Error::InvalidRange { file_size };

    let range_set = value.trim().strip_prefix("bytes=").ok_or_else(invalid)?;
    if range_set.contains(',') {
        return Err(invalid());
    }
    let (start_str, end_str) = range_set.split_once('-').ok_or_else(invalid)?;
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    let start: u64 = start_str.parse().map_err(|_| invalid())?;
    let end: u64 = if end_str.is_empty() {
        file_size.checked_sub(1).ok_or_else(invalid)?
    } else {
        end_str.parse().map_err(|_| invalid())?
    };

    if start > end || end >= file_size {
        return Err(invalid());
    }
    Ok(ByteRange { start, end })
}

/// Headers shared by full, partial and HEAD responses.
fn base_headers(ctx: &AppContext, mime: &str, modified: &DateTime<Utc>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(v) = HeaderValue::from_str(mime) {
        headers.insert(header::CONTENT_TYPE, v);
    }
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    if let Ok(v) = HeaderValue::from_str(&ctx.config.streaming.cache_control) {
        headers.insert(header::CACHE_CONTROL, v);
    }
    if let Ok(v) = HeaderValue::from_str(&http_date(modified)) {
        headers.insert(header::LAST_MODIFIED, v);
    }
    headers
}

/// Resolve `filename` to a streamable regular file.
///
/// Unsafe names, unsupported extensions, missing files and non-files are all
/// reported as `NotFound`.
async fn resolve(ctx: &AppContext, filename: &str) -> Result<(FileStat, &'static str), Error> {
    let not_found = || Error::not_found("video", filename);

    if !is_safe_filename(filename) {
        return Err(not_found());
    }
    let ext = extension_of(filename).ok_or_else(not_found)?;
    if !ctx.catalog.settings().extensions.contains(&ext) {
        return Err(not_found());
    }

    let stat = ctx.source().stat(filename).await.map_err(|_| not_found())?;
    if !stat.is_file {
        return Err(not_found());
    }
    Ok((stat, mime_for_extension(&ext)))
}

/// Serve the bytes of `filename`, honoring an optional `Range` header.
pub async fn serve_video(
    ctx: &AppContext,
    filename: &str,
    range_header: Option<&str>,
) -> Result<Response, Error> {
    let (stat, mime) = resolve(ctx, filename).await?;
    let file_size = stat.size;

    let range = range_header
        .map(|value| parse_range(value, file_size))
        .transpose()?;

    let mut file = ctx
        .source()
        .open(filename)
        .await
        .map_err(|_| Error::not_found("video", filename))?;

    let mut headers = base_headers(ctx, mime, &stat.modified);
    let chunk_size = ctx.config.streaming.chunk_size.max(4096);
    let guard = ctx.active_streams.acquire();

    match range {
        Some(range) => {
            file.seek(std::io::SeekFrom::Start(range.start))
                .await
                .map_err(|e| Error::Internal(format!("Seek failed: {e}")))?;

            let length = range.length();
            let stream = ReaderStream::with_capacity(file.take(length), chunk_size);
            let body = Body::from_stream(GuardedStream::new(stream, guard));

            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
            if let Ok(v) = HeaderValue::from_str(&format!(
                "bytes {}-{}/{file_size}",
                range.start, range.end
            )) {
                headers.insert(header::CONTENT_RANGE, v);
            }

            tracing::debug!(
                filename = %filename,
                start = range.start,
                end = range.end,
                "Serving partial content"
            );
            Ok((StatusCode::PARTIAL_CONTENT, headers, body).into_response())
        }
        None => {
            let stream = ReaderStream::with_capacity(file, chunk_size);
            let body = Body::from_stream(GuardedStream::new(stream, guard));

            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(file_size));

            tracing::debug!(filename = %filename, size = file_size, "Serving full content");
            Ok((StatusCode::OK, headers, body).into_response())
        }
    }
}

/// Answer a HEAD request with the headers of a full GET and no body.
///
/// A missing file yields a bare 404 with no body.
pub async fn head_video(ctx: &AppContext, filename: &str) -> Response {
    match resolve(ctx, filename).await {
        Ok((stat, mime)) => {
            let mut headers = base_headers(ctx, mime, &stat.modified);
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(stat.size));
            (StatusCode::OK, headers, Body::empty()).into_response()
        }
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_explicit_range() {
        let r = parse_range("bytes=0-99", 1000).unwrap();
        assert_eq!(r, ByteRange { start: 0, end: 99 });
        assert_eq!(r.length(), 100);
    }

    #[test]
    fn parse_open_end_defaults_to_last_byte() {
        let r = parse_range("bytes=500-", 1000).unwrap();
        assert_eq!(r, ByteRange { start: 500, end: 999 });
    }

    #[test]
    fn parse_last_byte() {
        assert_eq!(
            parse_range("bytes=999-999", 1000).unwrap(),
            ByteRange { start: 999, end: 999 }
        );
    }

    #[test]
    fn parse_tolerates_whitespace() {
        assert_eq!(
            parse_range(" bytes=10 - 20 ", 1000).unwrap(),
            ByteRange { start: 10, end: 20 }
        );
    }

    #[test]
    fn end_past_file_is_rejected_not_clamped() {
        let err = parse_range("bytes=500-2000", 1000).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { file_size: 1000 }));
    }

    #[test]
    fn malformed_ranges_are_rejected() {
        for bad in [
            "bytes=abc-def",
            "bytes=-100",
            "bytes=0-10,20-30",
            "items=0-10",
            "bytes=20-10",
            "bytes=1000-",
            "bytes=",
            "0-10",
        ] {
            assert!(parse_range(bad, 1000).is_err(), "{bad}");
        }
    }

    #[test]
    fn empty_file_has_no_satisfiable_range() {
        assert!(parse_range("bytes=0-", 0).is_err());
        assert!(parse_range("bytes=0-0", 0).is_err());
    }
}

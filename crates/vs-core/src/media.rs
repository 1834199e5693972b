//! Media-domain helpers: supported extensions, MIME lookup, identifiers, and
//! human-readable formatting.

use std::path::{Component, Path};

use chrono::{DateTime, Utc};

/// Extensions (lower-case, leading dot) recognized as video files by default.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    ".mp4", ".mkv", ".mov", ".avi", ".wmv", ".flv", ".webm", ".m4v",
];

/// MIME type used when an extension has no table entry.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Resolve the MIME type for a normalized extension (e.g. `".mkv"`).
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext {
        ".mp4" => "video/mp4",
        ".mkv" => "video/x-matroska",
        ".mov" => "video/quicktime",
        ".avi" => "video/x-msvideo",
        ".wmv" => "video/x-ms-wmv",
        ".flv" => "video/x-flv",
        ".webm" => "video/webm",
        ".m4v" => "video/x-m4v",
        _ => FALLBACK_MIME_TYPE,
    }
}

/// Normalize a configured extension to lower-case with a leading dot.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

/// Extract the last extension of `filename`, lower-cased with a leading dot.
///
/// Dotfiles such as `.mp4` have no extension.
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
}

/// Strip the last extension only: `a.b.mp4` becomes `a.b`.
pub fn display_name(filename: &str) -> String {
    match filename.rfind('.') {
        Some(idx) if idx > 0 && !filename[idx + 1..].is_empty() => filename[..idx].to_string(),
        _ => filename.to_string(),
    }
}

/// Stable short identifier for a catalog entry.
///
/// Rolling `h = h * 31 + byte` over the UTF-8 bytes of
/// `filename:extension:size`, wrapping at 32 bits, rendered in base 16.
/// Content is not hashed, so an in-place rewrite of the same size keeps the id.
pub fn video_id(filename: &str, ext: &str, size: u64) -> String {
    let base = format!("{filename}:{ext}:{size}");
    let hash = base
        .bytes()
        .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b)));
    format!("{hash:x}")
}

/// Format a byte count with binary units, e.g. `1536` becomes `"1.5 KB"`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut idx = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && idx < UNITS.len() - 1 {
        value /= 1024.0;
        idx += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[idx])
}

/// Percent-encode a path segment the way `encodeURIComponent` does.
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for b in input.bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

/// Render a timestamp as an RFC 7231 HTTP-date.
pub fn http_date(ts: &DateTime<Utc>) -> String {
    ts.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// A filename is safe when it is a single normal path component.
pub fn is_safe_filename(name: &str) -> bool {
    if name.is_empty() || name.contains('/') || name.contains('\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

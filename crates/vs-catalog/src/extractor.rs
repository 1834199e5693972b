//! Derive a [`VideoEntry`] from a filename, its stat record and its overlay.

use vs_core::{
    display_name, encode_uri_component, extension_of, format_file_size, mime_for_extension,
    video_id, Error, Result,
};
use vs_db::OverlayRecord;

use crate::entry::VideoEntry;
use crate::source::FileStat;

/// Return the normalized extension of `filename` if it is in `extensions`.
pub fn supported_extension(filename: &str, extensions: &[String]) -> Result<String> {
    match extension_of(filename) {
        Some(ext) if extensions.iter().any(|e| *e == ext) => Ok(ext),
        _ => Err(Error::UnsupportedType(filename.to_string())),
    }
}

/// Build the catalog entry for one file.
///
/// Fails with `UnsupportedType` for an extension outside `extensions` and with
/// `NotFound` when the stat record is not a regular file.
pub fn extract(
    filename: &str,
    stat: &FileStat,
    overlay: OverlayRecord,
    extensions: &[String],
    public_prefix: &str,
) -> Result<VideoEntry> {
    let extension = supported_extension(filename, extensions)?;
    if !stat.is_file {
        return Err(Error::not_found("video", filename));
    }

    Ok(VideoEntry {
        id: video_id(filename, &extension, stat.size),
        filename: filename.to_string(),
        display_name: display_name(filename),
        size: stat.size,
        size_formatted: format_file_size(stat.size),
        mime_type: mime_for_extension(&extension).to_string(),
        last_modified: stat.modified,
        url: format!(
            "{}/{}",
            public_prefix.trim_end_matches('/'),
            encode_uri_component(filename)
        ),
        content_generated: overlay.content_generated,
        title: overlay.title.filter(|t| !t.is_empty()),
        description: overlay.description.filter(|d| !d.is_empty()),
        meta: overlay.meta,
        added_at: stat.added_at(),
        extension,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use vs_core::VIDEO_EXTENSIONS;

    fn exts() -> Vec<String> {
        VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect()
    }

    fn stat(size: u64) -> FileStat {
        FileStat {
            size,
            modified: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            created: None,
            is_file: true,
        }
    }

    #[test]
    fn extracts_intrinsic_fields() {
        let e = extract(
            "My Clip.MP4",
            &stat(1536),
            OverlayRecord::empty("My Clip.MP4"),
            &exts(),
            "/videos",
        )
        .unwrap();
        assert_eq!(e.display_name, "My Clip");
        assert_eq!(e.extension, ".mp4");
        assert_eq!(e.mime_type, "video/mp4");
        assert_eq!(e.size_formatted, "1.5 KB");
        assert_eq!(e.url, "/videos/My%20Clip.MP4");
        assert!(!e.content_generated);
        assert_eq!(e.id, video_id("My Clip.MP4", ".mp4", 1536));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = extract(
            "notes.txt",
            &stat(1),
            OverlayRecord::empty("notes.txt"),
            &exts(),
            "/videos",
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
    }

    #[test]
    fn directory_is_not_found() {
        let mut st = stat(0);
        st.is_file = false;
        let err = extract("dir.mp4", &st, OverlayRecord::empty("dir.mp4"), &exts(), "/videos")
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn overlay_fields_are_joined() {
        let mut overlay = OverlayRecord::empty("a.mkv");
        overlay.content_generated = true;
        overlay.title = Some("Title".into());
        overlay.description = Some(String::new());
        let e = extract("a.mkv", &stat(10), overlay, &exts(), "/videos/").unwrap();
        assert!(e.content_generated);
        assert_eq!(e.title.as_deref(), Some("Title"));
        assert!(e.description.is_none());
        assert_eq!(e.url, "/videos/a.mkv");
    }

    #[test]
    fn allowed_extension_without_mime_falls_back() {
        let mut allowed = exts();
        allowed.push(".ts".into());
        let e = extract("a.ts", &stat(1), OverlayRecord::empty("a.ts"), &allowed, "/videos")
            .unwrap();
        assert_eq!(e.mime_type, vs_core::FALLBACK_MIME_TYPE);
    }
}

//! Thumbnail serving.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tokio_util::io::ReaderStream;
use vs_core::{is_safe_filename, Error};

use crate::context::AppContext;
use crate::error::AppError;

const THUMBNAIL_CACHE_CONTROL: &str = "public, max-age=86400";

/// GET /api/videos/{filename}/thumbnail
///
/// Serves `<video_dir>/<thumbnails_subdir>/<filename>.jpg`.
pub async fn get_thumbnail(
    State(ctx): State<AppContext>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let not_found = || Error::not_found("thumbnail", &filename);
    if !is_safe_filename(&filename) {
        return Err(not_found().into());
    }

    let path = ctx
        .source()
        .root()
        .join(&ctx.config.library.thumbnails_subdir)
        .join(format!("{filename}.jpg"));

    let file = tokio::fs::File::open(&path).await.map_err(|_| not_found())?;
    let meta = file.metadata().await.map_err(|_| not_found())?;
    if !meta.is_file() {
        return Err(not_found().into());
    }

    let stream = ReaderStream::with_capacity(file, 64 * 1024);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/jpeg")),
            (header::CONTENT_LENGTH, HeaderValue::from(meta.len())),
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static(THUMBNAIL_CACHE_CONTROL),
            ),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

//! Byte-stream route handlers for video files.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::Response;

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::streaming_helpers;

/// GET /videos/{filename} and GET /api/videos/{filename}
///
/// Full body without a `Range` header, 206 with one, 416 when it cannot be
/// satisfied.
pub async fn stream_video(
    State(ctx): State<AppContext>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let range = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok());

    Ok(streaming_helpers::serve_video(&ctx, &filename, range).await?)
}

/// HEAD /videos/{filename} and HEAD /api/videos/{filename}
pub async fn head_video(
    State(ctx): State<AppContext>,
    Path(filename): Path<String>,
) -> Response {
    streaming_helpers::head_video(&ctx, &filename).await
}

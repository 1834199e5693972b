//! Error-to-HTTP response conversion.
//!
//! Route handlers return `Result<T, AppError>`; any [`vs_core::Error`]
//! converts with `?`.

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: vs_core::Error,
}

impl AppError {
    pub fn new(inner: vs_core::Error) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &vs_core::Error {
        &self.inner
    }
}

impl From<vs_core::Error> for AppError {
    fn from(e: vs_core::Error) -> Self {
        Self::new(e)
    }
}

/// Stable machine-readable code for each error kind.
fn error_code(err: &vs_core::Error) -> &'static str {
    use vs_core::Error;
    match err {
        Error::DirectoryUnavailable { .. } => "directory_unavailable",
        Error::UnsupportedType(_) => "unsupported_type",
        Error::NotFound { .. } => "not_found",
        Error::InvalidRange { .. } => "invalid_range",
        Error::InvalidQuery(_) => "invalid_query",
        Error::StorageWriteFailed(_) => "storage_write_failed",
        Error::Database { .. } => "database_error",
        Error::Io { .. } => "io_error",
        Error::Config(_) => "config_error",
        Error::Internal(_) => "internal_error",
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if let vs_core::Error::InvalidRange { file_size } = self.inner {
            return (
                status,
                [(header::CONTENT_RANGE, format!("bytes */{file_size}"))],
                Body::empty(),
            )
                .into_response();
        }

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        }

        let body = json!({
            "success": false,
            "error": self.inner.to_string(),
            "code": error_code(&self.inner),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_produces_404() {
        let err = AppError::new(vs_core::Error::not_found("video", "a.mp4"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_query_produces_400() {
        let err = AppError::new(vs_core::Error::InvalidQuery("bad".into()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_range_has_content_range() {
        let err = AppError::new(vs_core::Error::InvalidRange { file_size: 1000 });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(
            response.headers().get(header::CONTENT_RANGE).unwrap(),
            "bytes */1000"
        );
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn directory_unavailable_is_500() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = AppError::new(vs_core::Error::directory_unavailable("/v", io));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn codes_are_distinct_for_client_errors() {
        assert_eq!(
            error_code(&vs_core::Error::UnsupportedType("x".into())),
            "unsupported_type"
        );
        assert_eq!(
            error_code(&vs_core::Error::InvalidQuery("x".into())),
            "invalid_query"
        );
    }
}

//! Content generation endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::context::AppContext;

/// Request body for POST /api/generate-content.
///
/// A non-empty `filenames` list takes precedence over `filename`.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    pub filename: Option<String>,
    pub filenames: Option<Vec<String>>,
}

impl GenerateRequest {
    /// Parse leniently: an unreadable body is treated as empty.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

/// POST /api/generate-content
pub async fn generate_content(State(ctx): State<AppContext>, body: Bytes) -> Response {
    let req = GenerateRequest::from_body(&body);

    if let Some(filenames) = req.filenames.filter(|f| !f.is_empty()) {
        tracing::info!(count = filenames.len(), "Bulk content generation requested");
        let results = ctx.generator.generate_bulk(&filenames).await;
        return (StatusCode::OK, Json(json!({ "success": true, "data": results }))).into_response();
    }

    if let Some(filename) = req.filename.filter(|f| !f.is_empty()) {
        let result = ctx.generator.generate_one(&filename).await;
        let status = if result.success {
            StatusCode::OK
        } else {
            StatusCode::BAD_REQUEST
        };
        return (
            status,
            Json(json!({
                "success": result.success,
                "error": result.error,
                "data": result,
            })),
        )
            .into_response();
    }

    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "error": "Invalid request body" })),
    )
        .into_response()
}

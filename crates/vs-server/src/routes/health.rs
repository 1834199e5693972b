//! Liveness, readiness and status probes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::context::AppContext;

/// GET /api/health -- 200 when the video directory can be read.
pub async fn health_check(State(ctx): State<AppContext>) -> impl IntoResponse {
    let root = ctx.source().root();
    match tokio::fs::read_dir(root).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "videoDir": root.display().to_string() })),
        ),
        Err(e) => {
            tracing::warn!(dir = %root.display(), error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "error", "message": "Video directory not accessible" })),
            )
        }
    }
}

/// GET /api/ready -- 200 when the video directory exists.
pub async fn ready(State(ctx): State<AppContext>) -> impl IntoResponse {
    let ready = tokio::fs::try_exists(ctx.source().root())
        .await
        .unwrap_or(false);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(json!({ "ready": ready })))
}

/// GET /api/live
pub async fn live() -> impl IntoResponse {
    Json(json!({ "live": true }))
}

/// GET /api/status
pub async fn status(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "env": {
            "videoDirectory": ctx.source().root().display().to_string(),
            "version": env!("CARGO_PKG_VERSION"),
            "overlayBackend": ctx.catalog.overlay().backend_name(),
        }
    }))
}

//! Catalog and streaming metrics endpoints.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::context::AppContext;
use crate::error::AppError;

/// GET /api/metrics -- catalog stats plus overlay counts.
pub async fn metrics_handler(State(ctx): State<AppContext>) -> Result<Json<Value>, AppError> {
    let stats = ctx.catalog.stats().await?;
    let mut metrics = serde_json::to_value(&stats)
        .map_err(|e| vs_core::Error::Internal(format!("metrics serialization: {e}")))?;
    if let Some(obj) = metrics.as_object_mut() {
        obj.insert(
            "generatedCount".into(),
            json!(ctx.catalog.overlay().generated_count()),
        );
        obj.insert("activeStreams".into(), json!(ctx.active_streams.count()));
    }
    Ok(Json(json!({ "success": true, "metrics": metrics })))
}

/// GET /api/streaming/stats
pub async fn streaming_stats(State(ctx): State<AppContext>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": { "activeStreams": ctx.active_streams.count() }
    }))
}

//! Axum router construction.
//!
//! Builds the application router with every route group and the middleware
//! layers (request id, security headers, CORS, tracing).

use axum::http::{header, Method};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::middleware::security::security_headers_middleware;
use crate::routes;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::RANGE])
        .expose_headers([
            header::CONTENT_RANGE,
            header::CONTENT_LENGTH,
            header::ACCEPT_RANGES,
        ]);

    let api = Router::new()
        // Catalog
        .route("/videos", get(routes::videos::list_videos))
        .route("/videos/search", get(routes::videos::search_videos))
        .route("/videos/stats", get(routes::videos::video_stats))
        .route("/videos/newly-added", get(routes::videos::newly_added))
        .route(
            "/videos/{filename}",
            get(routes::stream::stream_video).head(routes::stream::head_video),
        )
        .route(
            "/videos/{filename}/metadata",
            get(routes::videos::video_metadata),
        )
        .route(
            "/videos/{filename}/thumbnail",
            get(routes::thumbnails::get_thumbnail),
        )
        // Generation
        .route("/generate-content", post(routes::generate::generate_content))
        // Probes
        .route("/health", get(routes::health::health_check))
        .route("/ready", get(routes::health::ready))
        .route("/live", get(routes::health::live))
        .route("/status", get(routes::health::status))
        // Metrics
        .route("/metrics", get(routes::metrics::metrics_handler))
        .route("/streaming/stats", get(routes::metrics::streaming_stats));

    Router::new()
        .nest("/api", api)
        .route(
            "/videos/{filename}",
            get(routes::stream::stream_video).head(routes::stream::head_video),
        )
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

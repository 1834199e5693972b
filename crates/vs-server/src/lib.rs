//! vs-server: HTTP API over the video catalog.
//!
//! Ties the catalog, overlay store and streaming responder together into a
//! running Axum application:
//!
//! - JSON catalog endpoints (listing, search, stats, newly-added, metadata)
//! - Range-aware byte streaming with live stream accounting
//! - Content generation, probes and metrics
//! - Graceful shutdown via signal handling

pub mod active_streams;
pub mod context;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;

use std::net::SocketAddr;

use vs_core::config::Config;

pub use crate::context::AppContext;

/// Start the vidshelf server.
///
/// Opens the overlay store, builds the [`AppContext`] and serves until a
/// shutdown signal is received.
pub async fn start(config: Config) -> vs_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let backend = vs_db::open_backend(&config.overlay)?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| vs_core::Error::Internal(format!("Invalid server address: {e}")))?;

    tracing::info!(
        video_dir = %config.library.video_dir.display(),
        overlay = backend.name(),
        "Catalog configured"
    );

    let ctx = AppContext::from_config(config, backend);
    let app = router::build_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| vs_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Starting server on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| vs_core::Error::Internal(format!("Server error: {e}")))?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}

//! Axum HTTP server for metrics exposition and the REST API

use std::net::SocketAddr;

use axum::{routing::get, Router};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{Error, Result};
use crate::exporter::SharedRegistry;

use super::handlers;

/// Metrics endpoint handler
async fn metrics_handler() -> String {
    use prometheus_client::encoding::text::encode;
    let mut buffer = String::new();
    encode(&mut buffer, &crate::exporter::metrics::REGISTRY).unwrap();
    buffer
}

/// Run the exposition server until the token is cancelled
pub async fn run_server(
    registry: SharedRegistry,
    port: u16,
    cancel: CancellationToken,
) -> Result<()> {
    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/nodes", get(handlers::list_nodes))
        .layer(TraceLayer::new_for_http())
        .with_state(registry);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("metrics server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::ConfigError(format!("failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| Error::ConfigError(format!("server error: {}", e)))?;

    Ok(())
}

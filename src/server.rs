//! HTTP server setup.

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::error::{BjerknesError, Result};
use crate::handlers::{
    chart_handler, colortable_handler, colortables_handler, heartbeat_handler, metadata_handler,
};
use crate::logging::create_http_trace_layer;
use crate::state::AppState;

/// Build the router with every endpoint.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/heartbeat", get(heartbeat_handler))
        .route("/metadata", get(metadata_handler))
        .route("/colortables", get(colortables_handler))
        .route("/colortable", get(colortable_handler))
        .route("/chart", get(chart_handler))
        .layer(create_http_trace_layer())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM.
pub async fn serve(state: Arc<AppState>) -> Result<()> {
    let host = state
        .config
        .server
        .host
        .parse::<std::net::IpAddr>()
        .map_err(|e| BjerknesError::Config {
            message: format!("Invalid host address: {}", e),
        })?;
    let addr = SocketAddr::from((host, state.config.server.port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| BjerknesError::Server {
            message: format!("cannot bind {}: {}", addr, e),
        })?;
    info!(
        dataset = state.dataset.is_some(),
        maps_dir = %state.config.maps.maps_dir.display(),
        "Serving charts on http://{}",
        addr
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| BjerknesError::Server {
            message: format!("Server error: {}", e),
        })?;

    info!("Chart server stopped");
    Ok(())
}

/// Wait for a shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}

//! HTTP surface of the exporter.
//!
//! # Endpoints
//!
//! - `GET /metrics` - Runs a collection pass and renders it in the text format
//! - `GET /status` - Liveness probe, `{"status":"alive"}`
//!
//! Anything else is a 404.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::collector::StorjCollector;
use crate::error::{ExporterError, Result};
use crate::exposition;

/// Body of `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    fn alive() -> Self {
        Self {
            status: "alive".to_string(),
        }
    }
}

/// Build the exporter's routes around a shared collector.
pub fn router(collector: Arc<StorjCollector>) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/status", get(status))
        .with_state(collector)
}

async fn metrics(State(collector): State<Arc<StorjCollector>>) -> Response {
    let records = collector.collect().await;
    match exposition::encode(&records) {
        Ok(body) => ([(header::CONTENT_TYPE, exposition::content_type())], body).into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn status() -> Json<StatusResponse> {
    Json(StatusResponse::alive())
}

/// Bind the metrics listener.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ExporterError::Bind { addr, source })
}

/// Serve the exporter on `listener` until `shutdown` resolves.
///
/// In-flight scrapes are allowed to finish before this returns.
pub async fn serve<F>(
    listener: TcpListener,
    collector: Arc<StorjCollector>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Metrics server listening");
    }

    axum::serve(listener, router(collector))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ExporterError::Serve)
}

/// Resolves on SIGINT (ctrl-c) or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, exiting ..."),
        _ = terminate => info!("Received SIGTERM, exiting ..."),
    }
}

//! # HTTP Server
//!
//! Exposes the visitor log over HTTP for `eeon serve`.
//!
//! ```text
//! POST  /api/logVisitors   →  200 {"success": true}
//!                             500 {"success": false, "error": "..."}
//! other /api/logVisitors   →  405 {"message": "Method Not Allowed"}
//! GET   /api/visitorStats  →  200 {"total_visits": n, "unique_visitors": n}
//! ```

pub mod handlers;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{any, get};
use log::info;
use tokio::net::TcpListener;

use crate::visitors::VisitorLog;

#[derive(Clone)]
pub struct AppState {
    pub visitors: Arc<dyn VisitorLog>,
}

impl AppState {
    pub fn new(visitors: Arc<dyn VisitorLog>) -> Self {
        Self { visitors }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/logVisitors", any(handlers::log_visitors))
        .route("/api/visitorStats", get(handlers::visitor_stats))
        .with_state(state)
}

/// Binds `host:port` and serves until Ctrl+C.
pub async fn serve(host: &str, port: u16, visitors: Arc<dyn VisitorLog>) -> std::io::Result<()> {
    let listener = TcpListener::bind((host, port)).await?;
    serve_on(listener, visitors, shutdown_signal()).await
}

/// Serves on an already-bound listener until `shutdown` resolves.
pub async fn serve_on<F>(
    listener: TcpListener,
    visitors: Arc<dyn VisitorLog>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Visitor endpoint listening on {}", listener.local_addr()?);
    let router = build_router(AppState::new(visitors));
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

//! Liveness endpoint.
//!
//! Hosting platforms probe this port to decide the process is alive; the
//! scan loop runs regardless of whether anything ever connects.

use std::net::SocketAddr;

use axum::Router;
use tracing::info;

async fn home() -> &'static str {
    "scanner active (SMALL breakout + SWING continuation)"
}

async fn health() -> &'static str {
    "OK"
}

pub fn router() -> Router {
    Router::new()
        .route("/", axum::routing::get(home))
        .route("/health", axum::routing::get(health))
}

pub async fn serve(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "health endpoint listening");
    axum::serve(listener, router()).await
}

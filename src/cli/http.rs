//! Streamable HTTP transport.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use color_eyre::Result;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};

use crate::context::Context;
use crate::mcp::McpServer;

use super::shutdown_signal;

/// Logs one line per HTTP request.
async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::debug!(
        %method,
        path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "HTTP request"
    );
    response
}

/// Run the MCP server over streamable HTTP until a shutdown signal.
pub async fn run(ctx: Context) -> Result<()> {
    let listen_addr = ctx.config.http.listen_addr.clone();

    let service = StreamableHttpService::new(
        move || Ok(McpServer::new(ctx.clone())),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig::default(),
    );

    let app = Router::new()
        .fallback_service(service)
        .layer(middleware::from_fn(access_log));

    let addr: SocketAddr = listen_addr
        .parse()
        .map_err(|e| color_eyre::eyre::eyre!("Invalid address {}: {}", listen_addr, e))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!(transport = "http", %addr, "Ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "HTTP server error");
            color_eyre::eyre::eyre!("HTTP server error: {}", e)
        })?;

    tracing::info!("HTTP server shutting down");
    Ok(())
}

//! stdio transport.

use color_eyre::Result;
use rmcp::ServiceExt;
use tokio_util::sync::CancellationToken;

use crate::context::Context;
use crate::mcp::McpServer;

use super::shutdown_signal;

/// Run the MCP server on stdin/stdout until EOF or a shutdown signal.
pub async fn run(ctx: Context) -> Result<()> {
    let server = McpServer::new(ctx);
    let ct = CancellationToken::new();

    let service = server
        .serve_with_ct(rmcp::transport::stdio(), ct.clone())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to start MCP server");
            color_eyre::eyre::eyre!("Failed to start MCP server: {}", e)
        })?;

    tracing::info!(transport = "stdio", "Ready");

    let signal = tokio::spawn(async move {
        shutdown_signal().await;
        ct.cancel();
    });

    let reason = service.waiting().await.map_err(|e| {
        tracing::error!(error = %e, "MCP server error");
        color_eyre::eyre::eyre!("MCP server error: {}", e)
    })?;
    signal.abort();

    tracing::info!(reason = ?reason, "MCP server shutting down");
    Ok(())
}

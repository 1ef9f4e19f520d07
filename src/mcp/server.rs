//! MCP server implementation for axone-mcp.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::ToolCallContext, ServerHandler},
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    ErrorData as McpError, RoleServer,
};

use super::gate::{AccessGate, GatedRouter};
use crate::context::Context;
use crate::di::FromRef;

/// axone MCP server.
///
/// This server provides AI assistants with tools to:
/// - Read dataverse contract information
/// - Resolve the governance code attached to a dataverse resource
#[derive(Clone)]
pub struct McpServer {
    pub(crate) ctx: Arc<Context>,
    tools: Arc<GatedRouter<McpServer>>,
}

impl McpServer {
    /// Create a new MCP server with the given context.
    pub fn new(ctx: Context) -> Self {
        let gate = AccessGate::new(ctx.config.access_mode());
        tracing::info!(mode = ?gate.mode(), "Initializing axone MCP server");

        Self {
            ctx: Arc::new(ctx),
            tools: Arc::new(GatedRouter::new(Self::tool_router(), gate)),
        }
    }

    /// Build the combined tool router from all tool modules.
    fn tool_router() -> ToolRouter<Self> {
        Self::dataverse_tools() + Self::governance_tools()
    }

    /// Resolve a dependency from the context.
    pub fn resolve<T: FromRef<Context>>(&self) -> T {
        T::from_ref(&self.ctx)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                r#"Axone MCP Server

Read access to the dataverse contracts of an axone chain.

## Concepts

- **Dataverse**: registry contract; knows the address of its triplestore
- **Triplestore**: graph store (cognitarium) holding resource credentials
- **Law-stone**: contract storing a governance program

## Tools

- **get_dataverse_info** - Dataverse name and triplestore address
- **get_resource_governance_code** - Governance program of a resource in a given dataverse
- **get_governance_code** - Same, in the dataverse configured on the server
"#
                .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools.list()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = %request.name, "Tool call");
        self.tools
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

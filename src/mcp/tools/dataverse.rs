//! Dataverse tools - contract information.

use rmcp::{
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::{self, JsonSchema},
    service::RequestContext,
    tool, tool_router, ErrorData as McpError, RoleServer,
};
use serde::Deserialize;

use crate::mcp::params::required;
use crate::mcp::protocol::{tool_error, JsonText};
use crate::mcp::server::McpServer;
use crate::services::GovernanceResolver;

// ============================================================================
// Parameter Types
// ============================================================================

/// Parameters for get_dataverse_info tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DataverseInfoParams {
    /// The address of the dataverse contract.
    #[schemars(required)]
    pub dataverse: Option<String>,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router(router = dataverse_tools, vis = "pub(crate)")]
impl McpServer {
    /// Fetch the dataverse contract information (name and triplestore address).
    #[tool(
        description = "Get information about the given dataverse",
        annotations(
            title = "Get the dataverse information",
            read_only_hint = true,
            open_world_hint = true
        )
    )]
    pub async fn get_dataverse_info(
        &self,
        Parameters(params): Parameters<DataverseInfoParams>,
        ctx: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let dataverse = required(params.dataverse, "dataverse")?;
        tracing::info!(tool = "get_dataverse_info", dataverse = %dataverse, "Running tool");

        let resolver = self.resolve::<GovernanceResolver>();
        match resolver.dataverse(&dataverse, &ctx.ct).await {
            Ok(info) => JsonText(info).into(),
            Err(e) => {
                tracing::warn!(dataverse = %dataverse, error = %e, "Dataverse query failed");
                tool_error(&e)
            }
        }
    }
}

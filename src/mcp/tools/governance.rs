//! Governance tools - resolve the program governing a dataverse resource.

use rmcp::{
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::{self, JsonSchema},
    service::RequestContext,
    tool, tool_router, ErrorData as McpError, RoleServer,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::mcp::params::required;
use crate::mcp::protocol::{text, tool_error};
use crate::mcp::server::McpServer;
use crate::services::GovernanceResolver;

// ============================================================================
// Parameter Types
// ============================================================================

/// Parameters for get_resource_governance_code tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResourceGovernanceParams {
    /// The address of the dataverse contract.
    #[schemars(required)]
    pub dataverse: Option<String>,
    /// The DID URI of the resource.
    #[schemars(required)]
    pub resource: Option<String>,
}

/// Parameters for get_governance_code tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GovernanceParams {
    /// The DID URI of the resource.
    #[schemars(required)]
    pub resource: Option<String>,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router(router = governance_tools, vis = "pub(crate)")]
impl McpServer {
    #[tool(
        description = "Get the governance code attached to the given resource (if any) in the given dataverse",
        annotations(
            title = "Get the governance code of a resource",
            read_only_hint = true,
            open_world_hint = true
        )
    )]
    pub async fn get_resource_governance_code(
        &self,
        Parameters(params): Parameters<ResourceGovernanceParams>,
        ctx: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let dataverse = required(params.dataverse, "dataverse")?;
        let resource = required(params.resource, "resource")?;

        self.governance_code(&dataverse, &resource, &ctx).await
    }

    /// Same as `get_resource_governance_code`, against the dataverse the
    /// server was configured with.
    #[tool(
        description = "Get the governance code attached to the given resource (if any) in the configured dataverse",
        annotations(
            title = "Get the governance code of a resource in the default dataverse",
            read_only_hint = true,
            open_world_hint = true
        )
    )]
    pub async fn get_governance_code(
        &self,
        Parameters(params): Parameters<GovernanceParams>,
        ctx: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let resource = required(params.resource, "resource")?;
        let dataverse = self
            .ctx
            .config
            .dataverse_address
            .clone()
            .filter(|a| !a.is_empty())
            .ok_or(AppError::NoDefaultDataverse)?;

        self.governance_code(&dataverse, &resource, &ctx).await
    }
}

impl McpServer {
    async fn governance_code(
        &self,
        dataverse: &str,
        resource: &str,
        ctx: &RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(dataverse, resource, "Resolving governance code");

        let resolver = self.resolve::<GovernanceResolver>();
        match resolver.resolve(dataverse, resource, &ctx.ct).await {
            Ok(program) => text(program),
            Err(e) => {
                tracing::warn!(dataverse, resource, error = %e, "Governance resolution failed");
                tool_error(&e)
            }
        }
    }
}

//! Tool access gating.
//!
//! In read-only mode only tools annotated with `read_only_hint = true` are
//! listed and callable. Calls to any other tool are answered with a tool
//! error result and never reach their handler.

use std::future::Future;

use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::ToolCallContext},
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

/// Invocation policy applied to the tool set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
}

/// Policy check wrapped around tool handlers.
#[derive(Debug, Clone, Copy)]
pub struct AccessGate {
    mode: AccessMode,
}

impl AccessGate {
    pub fn new(mode: AccessMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Whether `tool` may be listed and invoked. Tools without annotations
    /// count as read-write.
    pub fn permits(&self, tool: &Tool) -> bool {
        match self.mode {
            AccessMode::ReadWrite => true,
            AccessMode::ReadOnly => tool
                .annotations
                .as_ref()
                .and_then(|a| a.read_only_hint)
                .unwrap_or(false),
        }
    }

    /// Tools visible under the current mode, in their original order.
    pub fn visible(&self, tools: Vec<Tool>) -> Vec<Tool> {
        tools.into_iter().filter(|t| self.permits(t)).collect()
    }

    /// Runs `handler` for `tool` if the policy allows it.
    ///
    /// A denied handler is dropped without being polled.
    pub async fn guard<F>(&self, tool: &Tool, handler: F) -> Result<CallToolResult, McpError>
    where
        F: Future<Output = Result<CallToolResult, McpError>>,
    {
        if !self.permits(tool) {
            tracing::warn!(tool = %tool.name, "Rejected tool call in read-only mode");
            return Ok(CallToolResult::error(vec![Content::text(format!(
                "tool \"{}\" is not available: the server is running in read-only mode",
                tool.name
            ))]));
        }
        handler.await
    }
}

/// A [`ToolRouter`] whose listing and dispatch go through an [`AccessGate`].
pub struct GatedRouter<S> {
    router: ToolRouter<S>,
    gate: AccessGate,
    catalog: Vec<Tool>,
}

impl<S> GatedRouter<S>
where
    S: Send + Sync + 'static,
{
    pub fn new(router: ToolRouter<S>, gate: AccessGate) -> Self {
        let catalog = router.list_all();
        Self {
            router,
            gate,
            catalog,
        }
    }

    /// Tools advertised to clients.
    pub fn list(&self) -> Vec<Tool> {
        self.gate.visible(self.catalog.clone())
    }

    /// Dispatches a call. Unknown tool names are left to the router, which
    /// answers them with a protocol error.
    pub async fn call(&self, call: ToolCallContext<'_, S>) -> Result<CallToolResult, McpError> {
        match self.catalog.iter().find(|t| t.name == call.name()) {
            Some(tool) => self.gate.guard(tool, self.router.call(call)).await,
            None => self.router.call(call).await,
        }
    }
}

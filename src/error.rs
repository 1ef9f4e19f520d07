//! Application error types with MCP protocol conversion.

use rmcp::model::ErrorCode;
use thiserror::Error;

use crate::config::ConfigError;

/// Application-level errors for axone-mcp.
#[derive(Error, Debug)]
pub enum AppError {
    // Startup errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("gRPC connection error: {0}")]
    Connection(#[from] tonic::transport::Error),

    // Tool argument errors
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("parameter {0} must not be empty")]
    EmptyParameter(&'static str),

    #[error("no default dataverse address configured")]
    NoDefaultDataverse,
}

impl AppError {
    /// Stable code attached to protocol errors.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Connection(_) => "CONNECTION_ERROR",
            AppError::MissingParameter(_) => "MISSING_PARAMETER",
            AppError::EmptyParameter(_) => "EMPTY_PARAMETER",
            AppError::NoDefaultDataverse => "NO_DEFAULT_DATAVERSE",
        }
    }
}

impl From<AppError> for rmcp::model::ErrorData {
    fn from(err: AppError) -> Self {
        let code = match &err {
            AppError::MissingParameter(_)
            | AppError::EmptyParameter(_)
            | AppError::NoDefaultDataverse => ErrorCode::INVALID_PARAMS,
            AppError::Config(_) | AppError::Connection(_) => ErrorCode::INTERNAL_ERROR,
        };

        let data = serde_json::json!({ "code": err.code() });
        rmcp::model::ErrorData::new(code, err.to_string(), Some(data))
    }
}

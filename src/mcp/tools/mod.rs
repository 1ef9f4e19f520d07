//! MCP tool implementations organized by domain.

pub mod dataverse;
pub mod governance;

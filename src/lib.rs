//! axone-mcp - MCP server for axone dataverses
//!
//! Exposes the dataverse contracts of an axone chain as MCP tools, most
//! notably the resolution of the governance code attached to a resource.

pub mod chain;
pub mod cli;
pub mod config;
pub mod context;
pub mod di;
pub mod error;
pub mod mcp;
pub mod services;
pub mod sparql;

pub use di::FromRef;

//! Model Context Protocol (MCP) server implementation for axone-mcp.
//!
//! This module provides an MCP server that lets AI assistants read the
//! dataverse contracts of an axone chain.
//!
//! ## Architecture
//!
//! The server uses dependency injection via the `Context` struct.
//! Services are resolved at tool execution time using `FromRef`. Every tool
//! call goes through a [`GatedRouter`], which enforces the configured
//! [`AccessMode`].
//!
//! ## Modules
//!
//! - `server`: MCP server implementation with tool router
//! - `gate`: read-only / read-write access policy
//! - `tools`: Tool implementations organized by domain

mod gate;
mod params;
mod protocol;
pub(crate) mod server;
mod tools;

pub use gate::{AccessGate, AccessMode, GatedRouter};
pub use server::McpServer;

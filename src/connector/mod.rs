//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - USDCode chat-completions HTTP client (reqwest)
//! - MCP server surface (rmcp)

pub mod adapter;

pub use adapter::*;

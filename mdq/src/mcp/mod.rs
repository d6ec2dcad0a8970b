//! MCP (Model Context Protocol) server for mdq
//!
//! This module implements an MCP server using stdio transport, exposing
//! Spotlight search to AI agents.
//!
//! ## Tools Exposed
//!
//! - `search` - Shorthand or native Spotlight query with limit, sort and format
//! - `meta` - Every Spotlight attribute of a single file
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mdq::mcp::McpServer;
//! use mdq::{Gateway, ServerConfig, SpotlightConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let gateway = Gateway::spotlight(SpotlightConfig::from_env());
//!     let server = McpServer::new(gateway, &ServerConfig::default()).unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

mod protocol;
mod registry;
mod server;
pub mod tools;

pub use protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolDefinition, ToolResult,
    MCP_PROTOCOL_VERSION,
};
pub use registry::ToolRegistry;
pub use server::McpServer;

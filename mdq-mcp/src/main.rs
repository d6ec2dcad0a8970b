//! mdq MCP Server
//!
//! A Model Context Protocol (MCP) server that exposes Spotlight search
//! to AI agents over stdio transport.
//!
//! ## Usage
//!
//! ```bash
//! # Start with every tool enabled
//! mdq-mcp
//!
//! # Only expose the search tool
//! mdq-mcp --tools search
//!
//! # Enable verbose logging
//! mdq-mcp --verbose
//! ```
//!
//! ## MCP Configuration
//!
//! Add to your MCP client configuration (e.g., Claude Desktop):
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "mdq": {
//!       "command": "mdq-mcp",
//!       "args": ["--tools", "search,meta"]
//!     }
//!   }
//! }
//! ```
//!
//! ## Available Tools
//!
//! - **search**: Shorthand or native Spotlight query with limit, sort and format
//! - **meta**: Every Spotlight attribute of a single file

use anyhow::Result;
use clap::Parser;
use mdq::config::ENV_LOG;
use mdq::mcp::McpServer;
use mdq::{Gateway, ServerConfig, SpotlightConfig, ToolSelection};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// mdq MCP Server - Expose Spotlight search to AI agents via Model Context Protocol
#[derive(Parser, Debug)]
#[command(name = "mdq-mcp")]
#[command(
    author,
    version,
    about = "mdq MCP Server - Model Context Protocol interface for Spotlight search"
)]
struct Args {
    /// Tools to enable (comma-separated, default: all)
    #[arg(long, short = 't', env = "MDQ_TOOLS", value_delimiter = ',')]
    tools: Vec<String>,

    /// Enable verbose logging (outputs to stderr)
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Args {
    fn server_config(&self) -> ServerConfig {
        ServerConfig::new(ToolSelection::from_names(&self.tools))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging to stderr (MCP uses stdout for protocol)
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| {
        if args.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("error")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let spotlight = SpotlightConfig::from_env();
    tracing::info!(
        "Starting mdq MCP server (mdfind: {}, mdls: {})",
        spotlight.mdfind.display(),
        spotlight.mdls.display()
    );

    // Unknown tool names fail here, before any request is read
    let server = McpServer::new(Gateway::spotlight(spotlight), &args.server_config())?;
    server.run().await?;

    Ok(())
}

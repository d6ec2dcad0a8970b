//! # mdq - Spotlight query shorthand
//!
//! Compiles a compact shorthand (`@name:`, `@content:`, `@mod:7` ...) into
//! Spotlight's native query language, runs it through `mdfind`/`mdls`, and
//! exposes the result to AI agents over MCP.
//!
//! mdq provides:
//! - **Query compiler**: shorthand to native Spotlight predicates
//! - **Gateway**: subprocess execution with limits and sorting
//! - **Formatters**: compact, full, paths and JSON output
//! - **MCP server** for AI agent integration
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mdq::{compile, Gateway, SearchRequest, SpotlightConfig};
//!
//! let gateway = Gateway::spotlight(SpotlightConfig::from_env());
//! let request = SearchRequest::new(compile("@content:TODO @mod:7"))
//!     .with_scopes(vec!["/Users/me/src".into()])
//!     .with_limit(20);
//! let results = gateway.execute(&request).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod gateway;
pub mod mcp;
pub mod query;

// Re-exports for convenience
pub use config::{ServerConfig, ToolSelection, DEFAULT_LIMIT};
pub use error::{Error, Result};
pub use format::{render, OutputFormat};
pub use gateway::{Gateway, SearchEngine, SearchRequest, SearchResult, SpotlightConfig};
pub use query::{compile, CompiledQuery, SortKey, SortSpec};

use std::path::PathBuf;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Expand a leading `~` to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(path.trim_start_matches('~').trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde() {
        let home = PathBuf::from(std::env::var_os("HOME").unwrap());
        assert_eq!(expand_tilde("~/Documents"), home.join("Documents"));
        assert_eq!(expand_tilde("~"), home);
        assert_eq!(expand_tilde("/tmp/~x"), PathBuf::from("/tmp/~x"));
        assert_eq!(expand_tilde("~other/x"), PathBuf::from("~other/x"));
    }
}

//! Error types for mdq

use thiserror::Error;

/// mdq error type
#[derive(Error, Debug)]
pub enum Error {
    /// The native engine rejected the compiled query string
    #[error("Query creation failed: {0}")]
    QueryCreationFailed(String),

    /// The native engine failed while executing a query
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// A path could not be resolved by the native engine
    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    /// Tool name not present in the registry
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Sort specification not understood
    #[error("Invalid sort: {0} (expected name, date, size or created, optionally prefixed with '-')")]
    InvalidSort(String),

    /// Output format not understood
    #[error("Invalid format: {0} (expected compact, full, paths or json)")]
    InvalidFormat(String),

    /// Required tool argument absent or of the wrong type
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for mdq operations
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for tool execution

use thiserror::Error;

/// Result type alias for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors that can occur while resolving or executing a tool
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool input did not match the declared schema
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// No tool with the requested name is registered
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// The tool body failed in a way it could not degrade gracefully
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),
}

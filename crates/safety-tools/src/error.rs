//! Error types for tool operations.

use thiserror::Error;

/// Errors that can occur during tool execution.
///
/// Nothing here escapes a dispatch: [`crate::ToolRegistry::dispatch`]
/// converts every variant into a fallback string for the model. The variants
/// exist so tools and tests can distinguish bad input (never retried, no
/// network call made) from upstream failures and empty results.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A required argument was blank or unusable. Surfaced before any
    /// network call.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing required parameter.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// A parameter was present but had the wrong shape.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The upstream service returned zero results.
    #[error("{0}")]
    NotFound(String),

    /// The upstream service failed or answered with garbage.
    #[error("Upstream service error: {0}")]
    Upstream(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local filesystem write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tool not found in registry.
    #[error("Tool not found: {0}")]
    UnknownTool(String),
}

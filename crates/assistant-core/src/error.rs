//! Error types for agent operations.

use thiserror::Error;

/// Errors that can occur while talking to the hosted agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Configuration problem (missing credential, bad URL).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network-level failure reaching the agent API.
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered but the response could not be used.
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    /// The event stream broke mid-turn.
    #[error("Stream error: {0}")]
    Stream(String),
}

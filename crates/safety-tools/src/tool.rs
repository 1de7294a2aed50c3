//! Tool trait definition and argument/output types.

use std::collections::HashMap;
use std::path::PathBuf;

use assistant_core::ToolSchema;
use async_trait::async_trait;
use serde_json::Value;

use crate::error::ToolError;

/// Arguments passed to a tool for execution.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    /// Parameters as key-value pairs, as chosen by the agent.
    pub params: HashMap<String, Value>,
}

impl ToolArgs {
    /// Create new tool arguments with the given parameters.
    pub fn new(params: HashMap<String, Value>) -> Self {
        Self { params }
    }

    /// Get a string parameter, returning an error if missing or not a string.
    pub fn get_string(&self, key: &str) -> Result<String, ToolError> {
        self.params
            .get(key)
            .ok_or_else(|| ToolError::MissingParameter(key.to_string()))?
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| ToolError::InvalidParameter {
                name: key.to_string(),
                reason: "expected string".to_string(),
            })
    }

    /// Get an optional string parameter.
    pub fn get_string_opt(&self, key: &str) -> Option<String> {
        self.params.get(key)?.as_str().map(|s| s.to_string())
    }

    /// Get an optional string parameter with a default value.
    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string_opt(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Get a required string parameter that must not be blank.
    ///
    /// This is the common contract for every tool's required text inputs:
    /// blank or whitespace-only values fail with `InvalidArgument` before any
    /// network call is made.
    pub fn require_text(&self, key: &str) -> Result<String, ToolError> {
        let value = self.get_string(key)?;
        if value.trim().is_empty() {
            return Err(ToolError::InvalidArgument(format!(
                "'{}' must not be empty",
                key
            )));
        }
        Ok(value)
    }

    /// Get an optional unsigned integer parameter with a default value.
    ///
    /// Accepts JSON numbers and numeric strings (models frequently send
    /// numbers as strings).
    pub fn get_u32_or(&self, key: &str, default: u32) -> Result<u32, ToolError> {
        match self.params.get(key) {
            None => Ok(default),
            Some(value) => {
                if let Some(n) = value.as_u64() {
                    return u32::try_from(n).map_err(|_| ToolError::InvalidParameter {
                        name: key.to_string(),
                        reason: "value out of range".to_string(),
                    });
                }
                if let Some(s) = value.as_str() {
                    if let Ok(n) = s.trim().parse::<u32>() {
                        return Ok(n);
                    }
                }
                Err(ToolError::InvalidParameter {
                    name: key.to_string(),
                    reason: "expected unsigned integer".to_string(),
                })
            }
        }
    }
}

/// Output from a tool execution.
///
/// Every result is a string so it can be folded back into the agent's
/// context; files a tool produced are referenced by path only.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// The result text.
    pub content: String,
    /// Whether the execution was successful.
    pub success: bool,
    /// Path to a file the tool wrote, if any.
    pub artifact_path: Option<PathBuf>,
}

impl ToolOutput {
    /// Create a successful output.
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            success: true,
            artifact_path: None,
        }
    }

    /// Create a failed output.
    pub fn failure(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            success: false,
            artifact_path: None,
        }
    }

    /// Attach the path of a file this execution produced.
    pub fn with_artifact(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_path = Some(path.into());
        self
    }
}

/// Trait for tools dispatched on behalf of the hosted agent.
///
/// Each tool performs exactly one external side effect per invocation and
/// returns a human-readable text block. Tools make exactly one upstream
/// attempt; there are no automatic retries.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's unique name (used for dispatch).
    fn name(&self) -> &str;

    /// The tool's parameter schema, advertised to the agent.
    fn schema(&self) -> ToolSchema;

    /// Manual next step offered to the user when this tool fails.
    fn fallback_advice(&self) -> &str {
        "If this is an emergency, call your local emergency services (911/112) directly."
    }

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError>;
}

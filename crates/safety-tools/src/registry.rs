//! Tool registry: name-to-handler dispatch with a hard failure boundary.

use std::collections::HashMap;
use std::sync::Arc;

use assistant_core::ToolSchema;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// Registry mapping tool names to handlers.
///
/// Registration order is preserved so the schema list advertised to the
/// agent is stable across runs. Dispatch is the failure boundary required of
/// every tool: whatever goes wrong inside a tool, the caller gets back a
/// string explaining the failure plus a manual next step - never an error.
pub struct ToolRegistry {
    /// Registered tools, in registration order.
    tools: IndexMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: IndexMap::new(),
        }
    }

    /// Register a tool.
    ///
    /// If a tool with the same name already exists, it will be replaced.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        info!("Registering tool: {}", name);
        self.tools.insert(name, Arc::new(tool));
    }

    /// Get a list of registered tool names, in registration order.
    pub fn list_tools(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Check if a tool is registered.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get the schemas for all registered tools, in registration order.
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Execute a tool by name, propagating its typed error.
    ///
    /// Most callers want [`dispatch`](Self::dispatch) instead; this is the
    /// raw path used by tests and by dispatch itself.
    pub async fn execute(
        &self,
        name: &str,
        params: HashMap<String, Value>,
    ) -> Result<ToolOutput, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        debug!("Executing tool '{}' with {} params", name, params.len());

        let result = tool.execute(ToolArgs::new(params)).await?;

        debug!(
            "Tool '{}' completed: success={}, content_len={}",
            name,
            result.success,
            result.content.len()
        );

        Ok(result)
    }

    /// Execute a tool by name; failures become fallback text, never errors.
    ///
    /// This is the contract the chat loop relies on: one tool's failure
    /// cannot abort the overall turn. The fallback string names what failed
    /// and offers the tool's manual next step.
    pub async fn dispatch(&self, name: &str, params: HashMap<String, Value>) -> ToolOutput {
        match self.execute(name, params).await {
            Ok(output) => output,
            Err(error) => {
                warn!("Tool '{}' failed: {}", name, error);
                ToolOutput::failure(self.fallback_text(name, &error))
            }
        }
    }

    /// Execute a tool with a JSON arguments string, as received from the
    /// agent's tool call. Unparseable arguments become fallback text too.
    pub async fn dispatch_json(&self, name: &str, args_json: &str) -> ToolOutput {
        let params: HashMap<String, Value> = match serde_json::from_str(args_json) {
            Ok(params) => params,
            Err(error) => {
                warn!("Tool '{}' received unparseable arguments: {}", name, error);
                return ToolOutput::failure(format!(
                    "The {} tool could not run: its arguments were not valid JSON. \
                     Please try again with plain values.",
                    name
                ));
            }
        };
        self.dispatch(name, params).await
    }

    /// Build the templated fallback string for a failed invocation.
    fn fallback_text(&self, name: &str, error: &ToolError) -> String {
        let advice = self
            .tools
            .get(name)
            .map(|t| t.fallback_advice().to_string())
            .unwrap_or_else(|| {
                "If this is an emergency, call your local emergency services (911/112) directly."
                    .to_string()
            });

        match error {
            ToolError::InvalidArgument(_)
            | ToolError::MissingParameter(_)
            | ToolError::InvalidParameter { .. } => {
                format!("The {} tool could not run: {}. {}", name, error, advice)
            }
            ToolError::NotFound(message) => {
                format!("{}. {}", message, advice)
            }
            _ => {
                format!("The {} tool failed: {}. {}", name, error, advice)
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

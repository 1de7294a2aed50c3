//! Tool parameter schemas.
//!
//! A [`ToolSchema`] is the static contract surface the hosted agent selects
//! tools from. It is defined at process start and immutable for the process
//! lifetime. Schemas render to OpenAI-style function definitions for the
//! chat-completion API.

use serde_json::{json, Map, Value};

/// The type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A string parameter.
    String,
    /// An integer parameter.
    Integer,
    /// A floating-point parameter.
    Number,
}

impl ParamKind {
    /// The JSON-schema type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Number => "number",
        }
    }
}

/// One named parameter in a tool's schema.
#[derive(Debug, Clone)]
pub struct ToolParameter {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    pub kind: ParamKind,
    /// Whether the parameter must be supplied.
    pub required: bool,
    /// Default value used when an optional parameter is omitted.
    pub default: Option<Value>,
    /// Human-readable description.
    pub description: String,
}

/// The full schema for one tool: its name, description, and ordered
/// parameter list.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    /// Tool name (used for dispatch).
    pub name: String,
    /// What the tool does, phrased for the model.
    pub description: String,
    /// Parameters in declaration order.
    pub params: Vec<ToolParameter>,
}

impl ToolSchema {
    /// Create a schema with no parameters.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
        }
    }

    /// Add a required parameter.
    pub fn required(
        mut self,
        name: impl Into<String>,
        kind: ParamKind,
        description: impl Into<String>,
    ) -> Self {
        self.params.push(ToolParameter {
            name: name.into(),
            kind,
            required: true,
            default: None,
            description: description.into(),
        });
        self
    }

    /// Add an optional parameter with a default value.
    pub fn optional(
        mut self,
        name: impl Into<String>,
        kind: ParamKind,
        default: Value,
        description: impl Into<String>,
    ) -> Self {
        self.params.push(ToolParameter {
            name: name.into(),
            kind,
            required: false,
            default: Some(default),
            description: description.into(),
        });
        self
    }

    /// Render the parameter list as a JSON-schema object.
    pub fn parameters_json(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &self.params {
            let mut prop = Map::new();
            prop.insert("type".to_string(), json!(param.kind.as_str()));
            let description = match &param.default {
                Some(default) => format!("{} (default: {})", param.description, default),
                None => param.description.clone(),
            };
            prop.insert("description".to_string(), json!(description));
            properties.insert(param.name.clone(), Value::Object(prop));

            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

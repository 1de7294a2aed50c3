//! OpenRouter chat completions API request and response types.
//!
//! The wire format is the OpenAI-compatible chat completions shape with
//! streaming chunks and tool calling.

use assistant_core::ToolSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message content: plain text, or multi-part (text plus images).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content.
    Text(String),
    /// Multi-part content.
    Parts(Vec<ContentPart>),
}

/// One part of a multi-part message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    /// A text part.
    #[serde(rename = "text")]
    Text { text: String },
    /// An image part, referenced by URL (data URLs included).
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

/// Image reference for a content part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// A chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", "assistant", or "tool"
    pub role: String,
    /// Message content (null for assistant messages that only carry tool calls)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
    /// Tool calls issued by the assistant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallPayload>>,
    /// For role "tool": which call this message answers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(MessageContent::Text(content.into())),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a user message with plain text.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(MessageContent::Text(content.into())),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a user message with text and an attached image data URL.
    pub fn user_with_image(text: impl Into<String>, image_data_url: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_data_url.into(),
                    },
                },
            ])),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: Some(MessageContent::Text(content.into())),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create an assistant message that carries tool calls.
    pub fn assistant_tool_calls(calls: Vec<ToolCallPayload>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: None,
            tool_calls: Some(calls),
            tool_call_id: None,
        }
    }

    /// Create a tool result message answering a specific call.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(MessageContent::Text(content.into())),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// A completed tool call, as echoed back to the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallPayload {
    /// Call ID assigned by the model
    pub id: String,
    /// Call type (always "function")
    #[serde(rename = "type")]
    pub call_type: String,
    /// The function invocation
    pub function: FunctionPayload,
}

/// Function name and arguments of a tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionPayload {
    /// Function name
    pub name: String,
    /// Arguments as a JSON string
    pub arguments: String,
}

/// A tool advertised to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool type (always "function")
    #[serde(rename = "type")]
    pub tool_type: String,
    /// The function description
    pub function: FunctionDefinition,
}

/// Function description inside a tool definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Function name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON schema for the parameters
    pub parameters: Value,
}

impl ToolDefinition {
    /// Build a definition from a tool schema.
    pub fn from_schema(schema: &ToolSchema) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: schema.name.clone(),
                description: schema.description.clone(),
                parameters: schema.parameters_json(),
            },
        }
    }
}

/// Chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Model to use
    pub model: String,
    /// Messages in the conversation
    pub messages: Vec<ChatMessage>,
    /// Stream the response as SSE chunks
    pub stream: bool,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Tools to make available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    /// Tool choice policy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
}

/// One streamed chunk of a chat completion.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChunk {
    /// Chunk choices
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

/// A choice inside a streamed chunk.
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkChoice {
    /// The incremental delta
    #[serde(default)]
    pub delta: Delta,
    /// Finish reason, present on the final chunk of a round
    pub finish_reason: Option<String>,
}

/// Incremental content in a streamed chunk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Delta {
    /// Text fragment
    pub content: Option<String>,
    /// Tool call fragments
    pub tool_calls: Option<Vec<ToolCallDelta>>,
}

/// One fragment of an in-progress tool call.
///
/// The model streams each call's name once and its arguments in pieces;
/// `index` identifies which in-flight call a fragment belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallDelta {
    /// Which in-flight call this fragment extends
    #[serde(default)]
    pub index: usize,
    /// Call ID, present on the first fragment
    pub id: Option<String>,
    /// Function fragments
    pub function: Option<FunctionDelta>,
}

/// Function fragments of a tool call delta.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionDelta {
    /// Function name, present on the first fragment
    pub name: Option<String>,
    /// Piece of the arguments JSON string
    pub arguments: Option<String>,
}

/// API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    /// Error details
    pub error: ApiErrorDetails,
}

/// API error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetails {
    /// Error message
    pub message: String,
    /// Error code
    pub code: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_core::ParamKind;
    use serde_json::json;

    #[test]
    fn test_text_message_serializes_flat() {
        let message = ChatMessage::user("hello");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hello"}));
    }

    #[test]
    fn test_image_message_serializes_as_parts() {
        let message = ChatMessage::user_with_image("what is this", "data:image/png;base64,AAAA");
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][1]["type"], "image_url");
        assert_eq!(
            value["content"][1]["image_url"]["url"],
            "data:image/png;base64,AAAA"
        );
    }

    #[test]
    fn test_assistant_tool_calls_omit_content() {
        let message = ChatMessage::assistant_tool_calls(vec![ToolCallPayload {
            id: "call_1".to_string(),
            call_type: "function".to_string(),
            function: FunctionPayload {
                name: "geocode".to_string(),
                arguments: r#"{"location": "Accra"}"#.to_string(),
            },
        }]);
        let value = serde_json::to_value(&message).unwrap();

        assert!(value.get("content").is_none());
        assert_eq!(value["tool_calls"][0]["function"]["name"], "geocode");
    }

    #[test]
    fn test_tool_result_carries_call_id() {
        let message = ChatMessage::tool_result("call_1", "Coordinates: (5.6, -0.2)");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "tool");
        assert_eq!(value["tool_call_id"], "call_1");
    }

    #[test]
    fn test_tool_definition_from_schema() {
        let schema = ToolSchema::new("geocode", "Find coordinates").required(
            "location",
            ParamKind::String,
            "Place name",
        );
        let definition = ToolDefinition::from_schema(&schema);
        let value = serde_json::to_value(&definition).unwrap();

        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "geocode");
        assert_eq!(value["function"]["parameters"]["type"], "object");
    }

    #[test]
    fn test_chunk_with_text_delta() {
        let body = r#"{"choices": [{"delta": {"content": "Hel"}, "finish_reason": null}]}"#;
        let chunk: ChatCompletionChunk = serde_json::from_str(body).unwrap();
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("Hel"));
        assert!(chunk.choices[0].finish_reason.is_none());
    }

    #[test]
    fn test_chunk_with_tool_call_delta() {
        let body = r#"{
            "choices": [{
                "delta": {
                    "tool_calls": [{
                        "index": 0,
                        "id": "call_abc",
                        "function": {"name": "geocode", "arguments": "{\"loc"}
                    }]
                },
                "finish_reason": null
            }]
        }"#;
        let chunk: ChatCompletionChunk = serde_json::from_str(body).unwrap();
        let delta = &chunk.choices[0].delta.tool_calls.as_ref().unwrap()[0];

        assert_eq!(delta.index, 0);
        assert_eq!(delta.id.as_deref(), Some("call_abc"));
        let function = delta.function.as_ref().unwrap();
        assert_eq!(function.name.as_deref(), Some("geocode"));
        assert_eq!(function.arguments.as_deref(), Some("{\"loc"));
    }

    #[test]
    fn test_continuation_delta_omits_index_and_id() {
        // Later fragments often carry only the arguments piece.
        let body = r#"{
            "choices": [{
                "delta": {"tool_calls": [{"function": {"arguments": "ation\": \"Accra\"}"}}]},
                "finish_reason": null
            }]
        }"#;
        let chunk: ChatCompletionChunk = serde_json::from_str(body).unwrap();
        let delta = &chunk.choices[0].delta.tool_calls.as_ref().unwrap()[0];

        assert_eq!(delta.index, 0);
        assert!(delta.id.is_none());
    }

    #[test]
    fn test_finish_reason_chunk() {
        let body = r#"{"choices": [{"delta": {}, "finish_reason": "tool_calls"}]}"#;
        let chunk: ChatCompletionChunk = serde_json::from_str(body).unwrap();
        assert_eq!(
            chunk.choices[0].finish_reason.as_deref(),
            Some("tool_calls")
        );
    }

    #[test]
    fn test_api_error_deserializes() {
        let body = r#"{"error": {"message": "Invalid API key", "code": 401}}"#;
        let error: ApiError = serde_json::from_str(body).unwrap();
        assert_eq!(error.error.message, "Invalid API key");
        assert_eq!(error.error.code, Some(401));
    }
}

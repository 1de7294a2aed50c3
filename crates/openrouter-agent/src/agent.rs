//! Streaming OpenRouter agent with tool dispatch.
//!
//! One exchange is a loop of streamed completion rounds: the model either
//! streams text to the user or asks for tool calls. Tool calls are executed
//! through the registry, their results are folded back into the message list,
//! and the next round starts. The loop ends when the model finishes a round
//! without tool calls or when the round budget runs out.

use std::path::Path;
use std::sync::Arc;

use assistant_core::{
    async_trait, Agent, AgentError, AgentEvent, ChatTurn, EventStream, TurnRole, UserMessage,
};
use base64::Engine;
use futures::StreamExt;
use reqwest_eventsource::{Event, RequestBuilderExt};
use safety_tools::ToolRegistry;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

use crate::api_types::{
    ApiError, ChatCompletionChunk, ChatCompletionRequest, ChatMessage, FunctionPayload,
    ToolCallDelta, ToolCallPayload, ToolDefinition,
};
use crate::config::OpenRouterConfig;

/// Event channel depth; the consumer is a terminal printer, so small is fine.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// A tool call being assembled from streamed fragments.
#[derive(Debug, Default, Clone)]
struct PendingToolCall {
    id: String,
    name: String,
    arguments: String,
}

/// How one streamed round ended.
enum RoundOutcome {
    /// The model finished its answer.
    Finished,
    /// The model asked for these tool calls.
    ToolCalls(Vec<PendingToolCall>),
}

/// Agent backed by the OpenRouter chat completions API.
pub struct OpenRouterAgent {
    client: reqwest::Client,
    config: OpenRouterConfig,
    registry: Arc<ToolRegistry>,
}

impl OpenRouterAgent {
    /// Create a new agent.
    pub fn new(config: OpenRouterConfig, registry: Arc<ToolRegistry>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .build()
                .expect("Failed to create HTTP client"),
            config,
            registry,
        }
    }

    /// The chat completions endpoint.
    fn chat_url(config: &OpenRouterConfig) -> String {
        format!(
            "{}/v1/chat/completions",
            config.api_url.trim_end_matches('/')
        )
    }

    /// Build the full message list for an exchange.
    async fn build_messages(
        config: &OpenRouterConfig,
        history: &[ChatTurn],
        message: &UserMessage,
    ) -> Result<Vec<ChatMessage>, AgentError> {
        let mut messages = vec![ChatMessage::system(config.system_prompt.clone())];

        for turn in history {
            match turn.role {
                TurnRole::User => messages.push(ChatMessage::user(turn.text.clone())),
                TurnRole::Assistant => messages.push(ChatMessage::assistant(turn.text.clone())),
            }
        }

        match &message.image_path {
            Some(path) => {
                let data_url = encode_image(path).await?;
                messages.push(ChatMessage::user_with_image(message.text.clone(), data_url));
            }
            None => messages.push(ChatMessage::user(message.text.clone())),
        }

        Ok(messages)
    }

    /// Drive one exchange to completion, emitting events on the channel.
    async fn run_exchange(
        client: reqwest::Client,
        config: OpenRouterConfig,
        registry: Arc<ToolRegistry>,
        mut messages: Vec<ChatMessage>,
        tx: mpsc::Sender<Result<AgentEvent, AgentError>>,
    ) {
        let tools: Vec<ToolDefinition> = registry
            .schemas()
            .iter()
            .map(ToolDefinition::from_schema)
            .collect();

        for round in 0..config.max_tool_rounds {
            let outcome =
                match Self::stream_round(&client, &config, &messages, &tools, &tx).await {
                    Ok(outcome) => outcome,
                    Err(error) => {
                        let _ = tx.send(Err(error)).await;
                        return;
                    }
                };

            let calls = match outcome {
                RoundOutcome::Finished => return,
                RoundOutcome::ToolCalls(calls) => calls,
            };

            debug!("Round {}: {} tool call(s)", round, calls.len());

            messages.push(ChatMessage::assistant_tool_calls(
                calls
                    .iter()
                    .map(|call| ToolCallPayload {
                        id: call.id.clone(),
                        call_type: "function".to_string(),
                        function: FunctionPayload {
                            name: call.name.clone(),
                            arguments: call.arguments.clone(),
                        },
                    })
                    .collect(),
            ));

            for call in &calls {
                info!("Executing tool '{}'", call.name);
                if tx
                    .send(Ok(AgentEvent::ToolStarted {
                        name: call.name.clone(),
                    }))
                    .await
                    .is_err()
                {
                    return;
                }

                let output = registry.dispatch_json(&call.name, &call.arguments).await;

                if tx
                    .send(Ok(AgentEvent::ToolCompleted {
                        name: call.name.clone(),
                        artifact_path: output.artifact_path.clone(),
                    }))
                    .await
                    .is_err()
                {
                    return;
                }

                messages.push(ChatMessage::tool_result(call.id.clone(), output.content));
            }
        }

        warn!(
            "Exchange exceeded {} tool rounds without finishing",
            config.max_tool_rounds
        );
        let _ = tx
            .send(Err(AgentError::ProcessingFailed(format!(
                "the model kept requesting tools after {} rounds",
                config.max_tool_rounds
            ))))
            .await;
    }

    /// Stream one completion round, forwarding text deltas as they arrive.
    async fn stream_round(
        client: &reqwest::Client,
        config: &OpenRouterConfig,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
        tx: &mpsc::Sender<Result<AgentEvent, AgentError>>,
    ) -> Result<RoundOutcome, AgentError> {
        let request = ChatCompletionRequest {
            model: config.model.clone(),
            messages: messages.to_vec(),
            stream: true,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            tools: if tools.is_empty() {
                None
            } else {
                Some(tools.to_vec())
            },
            tool_choice: if tools.is_empty() {
                None
            } else {
                Some("auto".to_string())
            },
        };

        let mut event_source = client
            .post(Self::chat_url(config))
            .bearer_auth(&config.api_key)
            .json(&request)
            .eventsource()
            .map_err(|e| AgentError::Network(e.to_string()))?;

        let mut pending: Vec<PendingToolCall> = Vec::new();
        let mut finish_reason: Option<String> = None;

        while let Some(event) = event_source.next().await {
            match event {
                Ok(Event::Open) => {
                    debug!("Completion stream opened");
                }
                Ok(Event::Message(msg)) => {
                    // OpenAI-compatible streams close with a literal sentinel.
                    if msg.data == "[DONE]" {
                        break;
                    }

                    let chunk: ChatCompletionChunk = match serde_json::from_str(&msg.data) {
                        Ok(chunk) => chunk,
                        Err(e) => {
                            warn!("Skipping unparseable chunk: {}", e);
                            continue;
                        }
                    };

                    let Some(choice) = chunk.choices.into_iter().next() else {
                        continue;
                    };

                    if let Some(text) = choice.delta.content {
                        if !text.is_empty()
                            && tx.send(Ok(AgentEvent::TextDelta(text))).await.is_err()
                        {
                            // Consumer hung up; stop streaming.
                            event_source.close();
                            return Ok(RoundOutcome::Finished);
                        }
                    }

                    if let Some(deltas) = choice.delta.tool_calls {
                        for delta in deltas {
                            apply_tool_call_delta(&mut pending, delta);
                        }
                    }

                    if let Some(reason) = choice.finish_reason {
                        finish_reason = Some(reason);
                    }
                }
                Err(reqwest_eventsource::Error::StreamEnded) => break,
                Err(reqwest_eventsource::Error::InvalidStatusCode(status, response)) => {
                    let detail = response
                        .json::<ApiError>()
                        .await
                        .map(|e| e.error.message)
                        .unwrap_or_else(|_| "no error details".to_string());
                    return Err(AgentError::Network(format!(
                        "API returned status {}: {}",
                        status, detail
                    )));
                }
                Err(e) => {
                    return Err(AgentError::Stream(e.to_string()));
                }
            }
        }

        if finish_reason.as_deref() == Some("tool_calls") && !pending.is_empty() {
            Ok(RoundOutcome::ToolCalls(pending))
        } else {
            Ok(RoundOutcome::Finished)
        }
    }
}

/// Fold one streamed fragment into the in-flight tool calls.
fn apply_tool_call_delta(pending: &mut Vec<PendingToolCall>, delta: ToolCallDelta) {
    if pending.len() <= delta.index {
        pending.resize_with(delta.index + 1, PendingToolCall::default);
    }
    let call = &mut pending[delta.index];

    if let Some(id) = delta.id {
        call.id = id;
    }
    if let Some(function) = delta.function {
        if let Some(name) = function.name {
            call.name = name;
        }
        if let Some(arguments) = function.arguments {
            call.arguments.push_str(&arguments);
        }
    }
}

/// Read an image file into a base64 data URL.
async fn encode_image(path: &Path) -> Result<String, AgentError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        AgentError::ProcessingFailed(format!("failed to read image {}: {}", path.display(), e))
    })?;

    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    };

    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(format!("data:{};base64,{}", mime, encoded))
}

#[async_trait]
impl Agent for OpenRouterAgent {
    async fn respond(
        &self,
        history: &[ChatTurn],
        message: &UserMessage,
    ) -> Result<EventStream, AgentError> {
        let messages = Self::build_messages(&self.config, history, message).await?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let client = self.client.clone();
        let config = self.config.clone();
        let registry = Arc::clone(&self.registry);

        tokio::spawn(Self::run_exchange(client, config, registry, messages, tx));

        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

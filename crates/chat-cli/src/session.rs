//! Chat session state: ordered turn history over a streaming agent.

use std::sync::Arc;

use assistant_core::{Agent, AgentEvent, ChatTurn, UserMessage};
use futures::StreamExt;
use tracing::{debug, warn};

/// A single conversation with an agent.
///
/// The session owns the turn history. Each call to [`send`](Self::send) runs
/// one full exchange: the user turn and the resulting assistant turn are both
/// appended before it returns, so the history is always a sequence of
/// completed turns. If the exchange fails partway, the assistant turn records
/// the error text instead of a partial answer; the history never contains a
/// half-streamed turn.
pub struct ChatSession {
    agent: Arc<dyn Agent>,
    turns: Vec<ChatTurn>,
}

impl ChatSession {
    /// Create a new empty session.
    pub fn new(agent: Arc<dyn Agent>) -> Self {
        Self {
            agent,
            turns: Vec::new(),
        }
    }

    /// The turn history so far.
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// The agent's display name.
    pub fn agent_name(&self) -> &str {
        self.agent.name()
    }

    /// Run one exchange. Events are forwarded to `on_event` as they arrive;
    /// the returned turn is the assistant turn appended to the history.
    pub async fn send<F>(&mut self, message: UserMessage, mut on_event: F) -> ChatTurn
    where
        F: FnMut(&AgentEvent),
    {
        // The agent sees the history as it was before this message.
        let history = self.turns.clone();
        self.turns.push(ChatTurn::from_user_message(&message));

        let assistant_turn = match self.agent.respond(&history, &message).await {
            Ok(mut stream) => {
                let mut text = String::new();
                let mut artifacts = Vec::new();
                let mut failure = None;

                while let Some(event) = stream.next().await {
                    match event {
                        Ok(event) => {
                            match &event {
                                AgentEvent::TextDelta(delta) => text.push_str(delta),
                                AgentEvent::ToolCompleted {
                                    artifact_path: Some(path),
                                    ..
                                } => artifacts.push(path.clone()),
                                _ => {}
                            }
                            on_event(&event);
                        }
                        Err(error) => {
                            warn!("Exchange failed mid-stream: {}", error);
                            failure = Some(error);
                            break;
                        }
                    }
                }

                match failure {
                    // A partial answer is replaced, not kept.
                    Some(error) => ChatTurn::assistant(error.to_string()),
                    None => {
                        debug!(
                            "Exchange complete: {} chars, {} artifact(s)",
                            text.len(),
                            artifacts.len()
                        );
                        ChatTurn::assistant(text).with_artifacts(artifacts)
                    }
                }
            }
            Err(error) => {
                warn!("Exchange could not start: {}", error);
                ChatTurn::assistant(error.to_string())
            }
        };

        self.turns.push(assistant_turn.clone());
        assistant_turn
    }
}

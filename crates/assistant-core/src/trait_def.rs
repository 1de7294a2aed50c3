//! The Agent trait.

use std::pin::Pin;

use async_trait::async_trait;
use futures::stream::Stream;

use crate::error::AgentError;
use crate::event::AgentEvent;
use crate::turn::{ChatTurn, UserMessage};

/// A stream of agent events, ending when the turn is complete.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<AgentEvent, AgentError>> + Send>>;

/// The interface to a hosted agent.
///
/// An agent takes the ordered turn history plus the latest user message and
/// produces a stream of [`AgentEvent`]s: text deltas interleaved with
/// tool-started/tool-completed signals. The agent itself decides which tools
/// to invoke and in what order; callers only consume the event stream and
/// must not assume tool events are non-overlapping with text.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Start one exchange: history + latest message in, event stream out.
    ///
    /// Only one exchange should be outstanding per session at a time.
    async fn respond(
        &self,
        history: &[ChatTurn],
        message: &UserMessage,
    ) -> Result<EventStream, AgentError>;

    /// The agent's display name.
    fn name(&self) -> &str;
}

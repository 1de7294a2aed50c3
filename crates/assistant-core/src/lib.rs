//! Core trait and types for the safety assistant.
//!
//! This crate provides the shared interface between the chat session loop,
//! the hosted-agent client, and the tool layer. It defines:
//!
//! - [`Agent`] - The trait a hosted-agent client implements
//! - [`ChatTurn`] / [`UserMessage`] - Conversation turn types
//! - [`AgentEvent`] - The streamed event variants a turn is folded from
//! - [`ToolSchema`] - The parameter contract surface the agent selects tools from
//! - [`AgentError`] - Error types for agent operations
//!
//! # Example
//!
//! ```rust
//! use assistant_core::{Agent, AgentError, AgentEvent, ChatTurn, EventStream, UserMessage};
//! use async_trait::async_trait;
//! use futures::stream;
//!
//! struct GreeterAgent;
//!
//! #[async_trait]
//! impl Agent for GreeterAgent {
//!     async fn respond(
//!         &self,
//!         _history: &[ChatTurn],
//!         _message: &UserMessage,
//!     ) -> Result<EventStream, AgentError> {
//!         let events = vec![Ok(AgentEvent::TextDelta("Hello!".to_string()))];
//!         Ok(Box::pin(stream::iter(events)))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "GreeterAgent"
//!     }
//! }
//! ```

mod error;
mod event;
mod schema;
mod trait_def;
mod turn;

pub use error::AgentError;
pub use event::AgentEvent;
pub use schema::{ParamKind, ToolParameter, ToolSchema};
pub use trait_def::{Agent, EventStream};
pub use turn::{ChatTurn, TurnRole, UserMessage};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

//! OpenRouter-backed agent implementation.
//!
//! Implements the [`assistant_core::Agent`] trait on top of the OpenRouter
//! chat completions API: streamed responses over SSE, OpenAI-style tool
//! calling, and tool dispatch through [`safety_tools::ToolRegistry`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use assistant_core::{Agent, UserMessage};
//! use openrouter_agent::{OpenRouterAgent, OpenRouterConfig};
//! use safety_tools::{default_registry, ToolsConfig};
//!
//! # async fn example() -> Result<(), assistant_core::AgentError> {
//! let registry = Arc::new(default_registry(ToolsConfig::from_env()));
//! let agent = OpenRouterAgent::new(OpenRouterConfig::from_env()?, registry);
//! let stream = agent.respond(&[], &UserMessage::text("Is Osu safe at night?")).await?;
//! # let _ = stream;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod api_types;
pub mod config;

pub use agent::OpenRouterAgent;
pub use config::{OpenRouterConfig, DEFAULT_SYSTEM_PROMPT};

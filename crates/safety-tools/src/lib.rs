//! Safety assistant tool implementations and dispatch.
//!
//! This crate provides the tools a conversational safety assistant can
//! call: geocoding, satellite maps, directions, location detection, case
//! submission, web search, risk assessment, safety tips, and emergency
//! resources. Tools implement the [`Tool`] trait and are dispatched by
//! name through a [`ToolRegistry`], which converts every failure into a
//! user-facing fallback message so a broken tool never takes down a
//! conversation.
//!
//! # Example
//!
//! ```no_run
//! use safety_tools::{default_registry, ToolsConfig};
//!
//! # async fn example() {
//! let registry = default_registry(ToolsConfig::from_env());
//! let output = registry
//!     .dispatch_json("risk_assessment", r#"{"situation": "someone is following me"}"#)
//!     .await;
//! println!("{}", output.content);
//! # }
//! ```

pub mod config;
pub mod error;
pub mod registry;
pub mod tool;
pub mod tools;

pub use config::{ToolsConfig, TwilioConfig};
pub use error::ToolError;
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolArgs, ToolOutput};

use tools::{
    CurrentLocation, Directions, Geocode, NearbyResources, RiskAssessment, SafetyTips,
    StaticMap, SubmitCase, WebSearch,
};

/// Build the standard registry with every built-in tool.
///
/// Registration order is fixed; it is the order tools are advertised to
/// the model.
pub fn default_registry(config: ToolsConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Geocode::new(config.clone()));
    registry.register(StaticMap::new(config.clone()));
    registry.register(Directions::new(config.clone()));
    registry.register(CurrentLocation::new());
    registry.register(SubmitCase::new(config.clone()));
    registry.register(WebSearch::new());
    registry.register(RiskAssessment::new());
    registry.register(SafetyTips::new());
    registry.register(NearbyResources::new(config));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_all_tools() {
        let registry = default_registry(ToolsConfig::default());
        let names = registry.list_tools();

        assert_eq!(names.len(), 9);
        for name in [
            "geocode",
            "static_map",
            "directions",
            "current_location",
            "submit_case",
            "web_search",
            "risk_assessment",
            "safety_tips",
            "nearby_resources",
        ] {
            assert!(registry.has_tool(name), "missing tool: {}", name);
        }
    }

    #[test]
    fn test_registration_order_is_stable() {
        let registry = default_registry(ToolsConfig::default());
        let names = registry.list_tools();
        assert_eq!(names[0], "geocode");
        assert_eq!(names[4], "submit_case");
        assert_eq!(names[8], "nearby_resources");
    }

    #[tokio::test]
    async fn test_unknown_tool_dispatch_degrades() {
        let registry = default_registry(ToolsConfig::default());
        let output = registry
            .dispatch("teleport", std::collections::HashMap::new())
            .await;
        assert!(!output.success);
    }
}

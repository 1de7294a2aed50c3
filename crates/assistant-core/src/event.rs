//! Streamed agent events.

use std::path::PathBuf;

/// One event in the agent's streamed response.
///
/// The chat session loop is a single-threaded consumer that folds a sequence
/// of these into one assistant turn. Text deltas are appended, never
/// replacing, the accumulating text. Tool events may interleave with text if
/// the hosted agent runs tools mid-response.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// An incremental fragment of assistant text.
    TextDelta(String),

    /// The agent started invoking a named tool.
    ToolStarted {
        /// Name of the tool being invoked.
        name: String,
    },

    /// A tool invocation finished.
    ToolCompleted {
        /// Name of the tool that finished.
        name: String,
        /// Path to a file the tool produced, if any (e.g. a map image).
        artifact_path: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_completed_carries_artifact() {
        let event = AgentEvent::ToolCompleted {
            name: "static_map".to_string(),
            artifact_path: Some(PathBuf::from("tmp/map.png")),
        };

        match event {
            AgentEvent::ToolCompleted { name, artifact_path } => {
                assert_eq!(name, "static_map");
                assert_eq!(artifact_path, Some(PathBuf::from("tmp/map.png")));
            }
            _ => panic!("Expected ToolCompleted"),
        }
    }
}

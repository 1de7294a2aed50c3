//! Static safety guidance by topic. Fully offline.

use assistant_core::{ParamKind, ToolSchema};
use async_trait::async_trait;

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// Topic-specific tips, lowercase keys matched by substring.
const TOPIC_TIPS: &[(&str, &[&str])] = &[
    (
        "theft",
        &[
            "Keep valuables out of sight, especially phones and wallets in crowds.",
            "Use bags that close fully and carry them across your body.",
            "If confronted, hand over possessions. Nothing you carry is worth your safety.",
            "Note descriptions (clothing, height, direction of travel) once you are safe.",
        ],
    ),
    (
        "harassment",
        &[
            "Move toward populated, well-lit areas and trusted businesses.",
            "Be firm and loud if someone will not leave you alone. Attention deters.",
            "Tell someone you trust where you are and who is bothering you.",
            "Save evidence such as messages or photos if it is safe to do so.",
        ],
    ),
    (
        "suspicious",
        &[
            "Trust your instincts. If something feels wrong, leave the area.",
            "Do not confront or follow suspicious individuals.",
            "Vary your route if you think you are being observed.",
            "Report suspicious activity to local authorities with as much detail as you can.",
        ],
    ),
    (
        "emergency",
        &[
            "Call the local emergency number first. In most countries 112 works.",
            "Give your location before anything else in case the call drops.",
            "Follow dispatcher instructions and stay on the line until told otherwise.",
            "If you cannot speak safely, many services accept silent or text reports.",
        ],
    ),
];

/// Tips that apply regardless of topic.
const GENERAL_TIPS: &[&str] = &[
    "Stay aware of your surroundings. Avoid walking with your head down in your phone.",
    "Share your live location with someone you trust when traveling alone.",
    "Keep your phone charged and know the local emergency number.",
    "Plan routes through well-lit, populated streets, especially at night.",
];

/// Return tips for a topic, falling back to general guidance.
fn tips_for(topic: &str) -> (&'static str, &'static [&'static str]) {
    let lowered = topic.to_lowercase();
    for (key, tips) in TOPIC_TIPS {
        if lowered.contains(key) {
            return (key, tips);
        }
    }
    ("general", GENERAL_TIPS)
}

/// Safety tips tool.
///
/// # Parameters
///
/// - `topic` (optional): Situation to get tips for, such as "theft" or
///   "harassment". Defaults to general guidance.
pub struct SafetyTips;

impl SafetyTips {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SafetyTips {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for SafetyTips {
    fn name(&self) -> &str {
        "safety_tips"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "safety_tips",
            "Get practical safety tips for a situation, such as theft, harassment, or emergencies.",
        )
        .optional(
            "topic",
            ParamKind::String,
            serde_json::json!("general"),
            "Situation to get tips for",
        )
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let topic = args.get_string_or("topic", "general");
        let (matched, tips) = tips_for(&topic);

        let mut text = format!("Safety tips ({}):\n", matched);
        for (i, tip) in tips.iter().enumerate() {
            text.push_str(&format!("{}. {}\n", i + 1, tip));
        }
        text.push_str("\nIf you are in immediate danger, stop reading and call emergency services.");

        Ok(ToolOutput::success(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use serde_json::Value;

    fn make_args(topic: &str) -> ToolArgs {
        let mut params = HashMap::new();
        params.insert("topic".to_string(), Value::String(topic.to_string()));
        ToolArgs::new(params)
    }

    #[test]
    fn test_topic_matching() {
        assert_eq!(tips_for("theft").0, "theft");
        assert_eq!(tips_for("I saw something suspicious").0, "suspicious");
        assert_eq!(tips_for("HARASSMENT on the bus").0, "harassment");
    }

    #[test]
    fn test_unknown_topic_is_general() {
        let (matched, tips) = tips_for("gardening");
        assert_eq!(matched, "general");
        assert_eq!(tips.len(), GENERAL_TIPS.len());
    }

    #[tokio::test]
    async fn test_execute_numbers_the_tips() {
        let tool = SafetyTips::new();
        let output = tool.execute(make_args("theft")).await.unwrap();
        assert!(output.success);
        assert!(output.content.contains("Safety tips (theft):"));
        assert!(output.content.contains("1. "));
        assert!(output.content.contains("4. "));
    }

    #[tokio::test]
    async fn test_execute_without_topic_defaults() {
        let tool = SafetyTips::new();
        let output = tool.execute(ToolArgs::default()).await.unwrap();
        assert!(output.content.contains("Safety tips (general):"));
    }
}

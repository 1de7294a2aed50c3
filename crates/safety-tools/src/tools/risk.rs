//! Keyword-based risk assessment for incident descriptions.
//!
//! This is a deliberately simple heuristic: it scans the description for
//! known danger keywords and maps the strongest match to a risk tier with
//! recommended actions. It runs entirely locally and never touches the
//! network, so it is always available as a first triage step.

use assistant_core::{ParamKind, ToolSchema};
use async_trait::async_trait;
use tracing::debug;

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// Keywords that indicate immediate danger.
const HIGH_RISK_KEYWORDS: &[&str] = &[
    "following",
    "stalking",
    "threat",
    "weapon",
    "violence",
    "attack",
    "danger",
    "emergency",
    "assault",
    "robbery",
];

/// Keywords that indicate elevated concern.
const MEDIUM_RISK_KEYWORDS: &[&str] = &[
    "suspicious",
    "harassment",
    "theft",
    "break-in",
    "unsafe",
    "concern",
    "witnessed",
    "crime",
];

/// Assessed risk tier, strongest keyword wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify a description. A single HIGH keyword outranks any number
    /// of MEDIUM keywords.
    pub fn classify(description: &str) -> Self {
        let lowered = description.to_lowercase();
        if HIGH_RISK_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            RiskLevel::High
        } else if MEDIUM_RISK_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    /// Recommended actions for this tier.
    pub fn recommended_actions(&self) -> &'static str {
        match self {
            RiskLevel::High => {
                "Call emergency services immediately (911/112). Get to a safe location. \
                 Do not pursue suspects."
            }
            RiskLevel::Medium => {
                "Stay alert, move to a populated area, consider contacting authorities. \
                 Document details if safe to do so."
            }
            RiskLevel::Low => "Maintain situational awareness and follow general safety precautions.",
        }
    }
}

/// Risk assessment tool.
///
/// Classification looks only at the situation text; location and context are
/// echoed into the output for the record but never affect the tier.
///
/// # Parameters
///
/// - `situation` (required): What is happening, in the user's words.
/// - `location` (optional): Where it is happening.
/// - `context` (optional): Anything else relevant.
pub struct RiskAssessment;

impl RiskAssessment {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for RiskAssessment {
    fn name(&self) -> &str {
        "risk_assessment"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "risk_assessment",
            "Assess the risk level of a described situation and recommend immediate actions.",
        )
        .required(
            "situation",
            ParamKind::String,
            "Description of the situation or incident",
        )
        .optional(
            "location",
            ParamKind::String,
            serde_json::json!(""),
            "Where it is happening",
        )
        .optional(
            "context",
            ParamKind::String,
            serde_json::json!(""),
            "Additional relevant details",
        )
    }

    fn fallback_advice(&self) -> &str {
        "When in doubt, treat the situation as serious and contact local authorities."
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let situation = args.require_text("situation")?;
        let location = args.get_string_or("location", "");
        let context = args.get_string_or("context", "");
        let level = RiskLevel::classify(&situation);

        debug!("Assessed risk level {}", level.as_str());

        let mut text = format!("Risk level: {}\n", level.as_str());
        if !location.trim().is_empty() {
            text.push_str(&format!("Location: {}\n", location));
        }
        if !context.trim().is_empty() {
            text.push_str(&format!("Context: {}\n", context));
        }
        text.push_str(&format!(
            "Recommended actions: {}",
            level.recommended_actions()
        ));

        Ok(ToolOutput::success(text))
    }
}

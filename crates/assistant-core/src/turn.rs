//! Chat turn types.

use std::path::PathBuf;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    /// The human user.
    User,
    /// The assistant.
    Assistant,
}

impl TurnRole {
    /// The wire-format role string ("user" or "assistant").
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// One turn in a chat session.
///
/// Turns are immutable once appended to the session history and live for the
/// session lifetime. Generated files are referenced by path only; the file on
/// disk is the single source of truth for binary content.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// Who produced the turn.
    pub role: TurnRole,
    /// The turn text.
    pub text: String,
    /// Image the user attached, if any.
    pub attached_image_path: Option<PathBuf>,
    /// Files produced by tools during this turn, in production order.
    pub artifact_paths: Vec<PathBuf>,
}

impl ChatTurn {
    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
            attached_image_path: None,
            artifact_paths: Vec::new(),
        }
    }

    /// Create a user turn from a [`UserMessage`].
    pub fn from_user_message(message: &UserMessage) -> Self {
        Self {
            role: TurnRole::User,
            text: message.text.clone(),
            attached_image_path: message.image_path.clone(),
            artifact_paths: Vec::new(),
        }
    }

    /// Create an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
            attached_image_path: None,
            artifact_paths: Vec::new(),
        }
    }

    /// Attach tool artifacts to the turn.
    pub fn with_artifacts(mut self, paths: Vec<PathBuf>) -> Self {
        self.artifact_paths = paths;
        self
    }
}

/// A user message about to be sent to the agent: text plus at most one
/// attached image.
#[derive(Debug, Clone)]
pub struct UserMessage {
    /// The message text.
    pub text: String,
    /// Optional image attachment.
    pub image_path: Option<PathBuf>,
}

impl UserMessage {
    /// Create a text-only message.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image_path: None,
        }
    }

    /// Create a message with an attached image.
    pub fn with_image(text: impl Into<String>, image_path: impl Into<PathBuf>) -> Self {
        Self {
            text: text.into(),
            image_path: Some(image_path.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_strings() {
        assert_eq!(TurnRole::User.as_str(), "user");
        assert_eq!(TurnRole::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_turn_from_user_message() {
        let message = UserMessage::with_image("what is this?", "photo.jpg");
        let turn = ChatTurn::from_user_message(&message);

        assert_eq!(turn.role, TurnRole::User);
        assert_eq!(turn.text, "what is this?");
        assert_eq!(turn.attached_image_path, Some(PathBuf::from("photo.jpg")));
        assert!(turn.artifact_paths.is_empty());
    }

    #[test]
    fn test_with_artifacts() {
        let turn = ChatTurn::assistant("here is your map")
            .with_artifacts(vec![PathBuf::from("tmp/map_1.png")]);

        assert_eq!(turn.artifact_paths.len(), 1);
    }
}

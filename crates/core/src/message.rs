//! Turn and message domain types.
//!
//! Two shapes of the same conversation flow through the system:
//! - [`Turn`]: what the session records (who spoke, what, when)
//! - [`ChatMessage`]: what the model receives (role-tagged text only)
//!
//! The transcript normalizer is the only place that maps one onto the other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a turn.
///
/// Transcripts read back from an external source may carry a tag this
/// build does not know; those deserialize as [`Speaker::Unknown`] instead
/// of failing the whole transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Speaker {
    /// The student chatting with the tutor
    Student,
    /// The tutor persona (model replies and fallback replies)
    Teacher,
    /// Unrecognized tag
    Unknown,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::Student => "student",
            Speaker::Teacher => "teacher",
            Speaker::Unknown => "unknown",
        }
    }
}

impl From<String> for Speaker {
    fn from(tag: String) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "student" | "user" => Speaker::Student,
            "teacher" | "assistant" | "model" => Speaker::Teacher,
            _ => Speaker::Unknown,
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message exchanged by either the student or the tutor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Who sent this turn
    pub speaker: Speaker,

    /// The text content
    pub text: String,

    /// When the turn was recorded
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Create a new student turn.
    pub fn student(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Student,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new tutor turn.
    pub fn teacher(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Teacher,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Role tag understood by the model service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Text from the student side (including the persona instruction)
    User,
    /// Text from the model side (including the canned acknowledgement)
    Model,
}

/// A single role-tagged entry of the request sent to the model.
///
/// Deliberately carries no ids or timestamps: the same transcript always
/// normalizes to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a user-side message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create a model-side message.
    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_student_turn() {
        let turn = Turn::student("1/2 + 1/3 berapa?");
        assert_eq!(turn.speaker, Speaker::Student);
        assert_eq!(turn.text, "1/2 + 1/3 berapa?");
    }

    #[test]
    fn unknown_speaker_tag_deserializes() {
        let json = r#"{"speaker":"narrator","text":"...","timestamp":"2024-05-01T08:00:00Z"}"#;
        let turn: Turn = serde_json::from_str(json).unwrap();
        assert_eq!(turn.speaker, Speaker::Unknown);
    }

    #[test]
    fn legacy_role_tags_are_recognized() {
        assert_eq!(Speaker::from("user".to_string()), Speaker::Student);
        assert_eq!(Speaker::from("assistant".to_string()), Speaker::Teacher);
        assert_eq!(Speaker::from("Teacher".to_string()), Speaker::Teacher);
    }

    #[test]
    fn speaker_serializes_lowercase() {
        let json = serde_json::to_string(&Speaker::Teacher).unwrap();
        assert_eq!(json, "\"teacher\"");
    }

    #[test]
    fn chat_message_has_no_volatile_fields() {
        let a = serde_json::to_string(&ChatMessage::user("halo")).unwrap();
        let b = serde_json::to_string(&ChatMessage::user("halo")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, r#"{"role":"user","content":"halo"}"#);
    }
}

//! Session: one student's conversation with the tutor.
//!
//! A session has exactly two stages: waiting for the student's name, then
//! chatting. The transition is one-way, and the name is fixed once set.
//! Turns are append-only; nothing here can reorder, edit, or drop them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;
use crate::message::Turn;

/// Unique identifier for a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum SessionStage {
    AwaitingName,
    Chatting { student_name: String },
}

/// Returned to the host when a name is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStarted {
    pub session_id: SessionId,
    pub student_name: String,
    pub greeting: String,
}

/// A single student's session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    stage: SessionStage,
    turns: Vec<Turn>,
    created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session waiting for a name.
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            stage: SessionStage::AwaitingName,
            turns: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn stage(&self) -> &SessionStage {
        &self.stage
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The student's name, once the session is chatting.
    pub fn student_name(&self) -> Option<&str> {
        match &self.stage {
            SessionStage::AwaitingName => None,
            SessionStage::Chatting { student_name } => Some(student_name),
        }
    }

    /// Recorded turns, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Accept the student's name and move to the chatting stage.
    ///
    /// The name is trimmed. Empty names leave the session waiting; a second
    /// name is rejected because the first one is final.
    pub fn start(&mut self, name: &str) -> Result<String, SessionError> {
        if let SessionStage::Chatting { student_name } = &self.stage {
            return Err(SessionError::AlreadyStarted(student_name.clone()));
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }

        self.stage = SessionStage::Chatting {
            student_name: name.to_string(),
        };
        Ok(name.to_string())
    }

    /// Append a turn. Only valid while chatting.
    pub fn record(&mut self, turn: Turn) -> Result<(), SessionError> {
        if self.student_name().is_none() {
            return Err(SessionError::NotStarted);
        }
        self.turns.push(turn);
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

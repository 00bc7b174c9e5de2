//! Logbook trait: best-effort, append-only record of every exchange.
//!
//! A logbook receives one row per turn. It may be entirely absent (no
//! spreadsheet configured), in which case the no-op implementation accepts
//! and discards every row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LogbookError;
use crate::message::{Speaker, Turn};

/// Timestamp format written to the spreadsheet.
pub const ROW_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One logged row: (timestamp, student name, role, text).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRow {
    pub timestamp: DateTime<Utc>,
    pub student_name: String,
    pub speaker: Speaker,
    pub text: String,
}

impl LogRow {
    /// Build the row describing `turn` in `student_name`'s session.
    pub fn from_turn(student_name: &str, turn: &Turn) -> Self {
        Self {
            timestamp: turn.timestamp,
            student_name: student_name.to_string(),
            speaker: turn.speaker,
            text: turn.text.clone(),
        }
    }

    /// The row as spreadsheet cells, in column order.
    pub fn cells(&self) -> [String; 4] {
        [
            self.timestamp.format(ROW_TIMESTAMP_FORMAT).to_string(),
            self.student_name.clone(),
            self.speaker.as_str().to_string(),
            self.text.clone(),
        ]
    }
}

/// The logbook boundary.
#[async_trait]
pub trait Logbook: Send + Sync {
    /// A human-readable name for this logbook (e.g., "sheets", "none").
    fn name(&self) -> &str;

    /// Append one row.
    async fn append(&self, row: LogRow) -> Result<(), LogbookError>;
}

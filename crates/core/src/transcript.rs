//! Transcript normalizer: the single place model history is assembled.
//!
//! Maps the session's recorded turns onto role-tagged messages, behind the
//! persona prefix. The newest, still-unanswered student text is NOT part of
//! the input; the dispatcher appends it.

use tracing::debug;

use crate::message::{ChatMessage, Speaker, Turn};
use crate::persona::PersonaConfig;

/// Normalize `turns` for `student_name` under `persona`.
///
/// The output always starts with the two persona messages, then one message
/// per recognized turn in the original order. Turns with an unknown speaker
/// are skipped; they never fail the whole transcript.
pub fn normalize(persona: &PersonaConfig, student_name: &str, turns: &[Turn]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(turns.len() + 2);
    messages.extend(persona.prefix(student_name));

    for (index, turn) in turns.iter().enumerate() {
        match turn.speaker {
            Speaker::Student => messages.push(ChatMessage::user(&turn.text)),
            Speaker::Teacher => messages.push(ChatMessage::model(&turn.text)),
            Speaker::Unknown => {
                debug!(index, "Skipping turn with unrecognized speaker");
            }
        }
    }

    messages
}

//! # Math Relax Core
//!
//! Domain types, traits, and error definitions for the Math Relax fraction
//! tutor. This crate has **no I/O**: it defines the conversation model
//! (turns, sessions, persona) and the seams the other crates implement.
//!
//! ## Design Philosophy
//!
//! Both external collaborators are traits here:
//! - [`Provider`]: the language-model service
//! - [`Logbook`]: the optional spreadsheet log
//!
//! Implementations live in `mathrelax-providers` and `mathrelax-logbook`,
//! so the tutor can be exercised end to end with stub implementations.

pub mod error;
pub mod logbook;
pub mod message;
pub mod persona;
pub mod provider;
pub mod session;
pub mod speech;
pub mod transcript;

// Re-export key types at crate root for ergonomics
pub use error::{Error, LogbookError, ProviderError, SessionError};
pub use logbook::{LogRow, Logbook};
pub use message::{ChatMessage, ChatRole, Speaker, Turn};
pub use persona::PersonaConfig;
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use session::{Session, SessionId, SessionStage, SessionStarted};
pub use speech::speakable_text;
pub use transcript::normalize;

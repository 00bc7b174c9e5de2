//! Error types for the Math Relax domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each boundary has its own error type so callers can decide, per tier,
//! whether a failure is fatal, degraded, or silent:
//!
//! - [`ProviderError`]: model calls; degraded to a fallback reply
//! - [`LogbookError`]: spreadsheet appends; swallowed
//! - [`SessionError`]: host misuse of the session state machine

use thiserror::Error;

/// The top-level error type for all Math Relax operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Logbook errors ---
    #[error("Logbook error: {0}")]
    Logbook(#[from] LogbookError),

    // --- Session errors ---
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

// --- Boundary errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited or quota exhausted: {0}")]
    RateLimited(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Model returned no text: {0}")]
    EmptyResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum LogbookError {
    #[error("Logbook not configured: {0}")]
    NotConfigured(String),

    #[error("Row append rejected (status: {status_code}): {message}")]
    Rejected { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Student name must not be empty")]
    EmptyName,

    #[error("Session already started for {0}")]
    AlreadyStarted(String),

    #[error("Session has not started yet, submit a name first")]
    NotStarted,

    #[error("Message must not be empty")]
    EmptyMessage,
}

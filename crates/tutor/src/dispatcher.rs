//! Request dispatcher: one model call per student message.
//!
//! This is the fail-soft boundary: whatever goes wrong talking to the model
//! (network, authentication, quota, malformed or empty reply), the student
//! gets the configured fallback reply and the session carries on. Nothing
//! is retried and no error escapes.

use std::sync::Arc;

use mathrelax_core::message::ChatMessage;
use mathrelax_core::provider::{Provider, ProviderRequest};
use serde::Serialize;
use tracing::{debug, warn};

/// What the student sees for one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Reply {
    /// The model's reply, unmodified
    Answer(String),
    /// The fixed fallback text, used when the model call failed
    Fallback(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Answer(text) | Reply::Fallback(text) => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Reply::Fallback(_))
    }
}

/// Sends normalized history plus the newest student text to the model.
pub struct RequestDispatcher {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    fallback_reply: String,
}

impl RequestDispatcher {
    /// Create a dispatcher for a resolved model name.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        fallback_reply: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            fallback_reply: fallback_reply.into(),
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Cap the reply length.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Build the request: prior history, then the new student text last.
    pub fn request(&self, mut history: Vec<ChatMessage>, text: &str) -> ProviderRequest {
        history.push(ChatMessage::user(text));
        ProviderRequest {
            model: self.model.clone(),
            messages: history,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Issue one call and return the reply, or the fallback on any failure.
    pub async fn dispatch(&self, history: Vec<ChatMessage>, text: &str) -> Reply {
        let request = self.request(history, text);
        debug!(
            provider = %self.provider.name(),
            model = %self.model,
            messages = request.messages.len(),
            "Dispatching student message"
        );

        match self.provider.complete(request).await {
            Ok(response) => {
                if let Some(usage) = &response.usage {
                    debug!(
                        prompt_tokens = usage.prompt_tokens,
                        completion_tokens = usage.completion_tokens,
                        "Model replied"
                    );
                }
                Reply::Answer(response.text)
            }
            Err(e) => {
                warn!(provider = %self.provider.name(), error = %e, "Model call failed, sending fallback reply");
                Reply::Fallback(self.fallback_reply.clone())
            }
        }
    }
}

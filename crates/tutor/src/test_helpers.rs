//! Shared test doubles for tutor tests.

use mathrelax_core::error::{LogbookError, ProviderError};
use mathrelax_core::logbook::{LogRow, Logbook};
use mathrelax_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use std::sync::Mutex;

/// A provider that returns scripted replies in order and records every request.
///
/// Once the script runs out, the last reply is repeated.
pub struct ScriptedProvider {
    replies: Vec<String>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: replies.into_iter().map(String::from).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always reply with the same text.
    pub fn text(reply: &str) -> Self {
        Self::new(vec![reply])
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let index = requests.len().min(self.replies.len().saturating_sub(1));
        let model = request.model.clone();
        requests.push(request);

        Ok(ProviderResponse {
            text: self.replies.get(index).cloned().unwrap_or_default(),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model,
        })
    }
}

/// A provider whose every call fails with the same error.
pub struct FailingProvider {
    error: ProviderError,
    calls: Mutex<usize>,
}

impl FailingProvider {
    pub fn new(error: ProviderError) -> Self {
        Self {
            error,
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        *self.calls.lock().unwrap() += 1;
        Err(self.error.clone())
    }
}

/// A logbook that keeps rows in memory, or rejects them all.
#[derive(Default)]
pub struct RecordingLogbook {
    rows: Mutex<Vec<LogRow>>,
    reject: bool,
}

impl RecordingLogbook {
    pub fn rejecting() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            reject: true,
        }
    }

    pub fn rows(&self) -> Vec<LogRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Logbook for RecordingLogbook {
    fn name(&self) -> &str {
        "recording_mock"
    }

    async fn append(&self, row: LogRow) -> Result<(), LogbookError> {
        if self.reject {
            return Err(LogbookError::Rejected {
                status_code: 403,
                message: "permission denied".into(),
            });
        }
        self.rows.lock().unwrap().push(row);
        Ok(())
    }
}

/// A logbook whose appends never complete.
pub struct StalledLogbook;

#[async_trait::async_trait]
impl Logbook for StalledLogbook {
    fn name(&self) -> &str {
        "stalled_mock"
    }

    async fn append(&self, _row: LogRow) -> Result<(), LogbookError> {
        std::future::pending().await
    }
}

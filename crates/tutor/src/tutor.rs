//! The tutor: host-facing operations over an explicit [`Session`].
//!
//! One `Tutor` is shared by every session of the process; it holds only
//! immutable things (persona, dispatcher, logbook). All per-student state
//! lives in the `Session` the caller passes in.
//!
//! Spreadsheet rows are written by a detached task per exchange, so a slow
//! or unreachable logbook never delays a reply.

use std::sync::{Arc, Mutex, PoisonError};

use mathrelax_config::AppConfig;
use mathrelax_core::error::SessionError;
use mathrelax_core::logbook::{LogRow, Logbook};
use mathrelax_core::message::Turn;
use mathrelax_core::persona::PersonaConfig;
use mathrelax_core::provider::Provider;
use mathrelax_core::session::{Session, SessionStarted};
use mathrelax_core::transcript;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::dispatcher::{Reply, RequestDispatcher};

pub struct Tutor {
    persona: PersonaConfig,
    dispatcher: RequestDispatcher,
    logbook: Arc<dyn Logbook>,
    pending_logs: Mutex<JoinSet<()>>,
}

impl Tutor {
    pub fn new(persona: PersonaConfig, dispatcher: RequestDispatcher, logbook: Arc<dyn Logbook>) -> Self {
        Self {
            persona,
            dispatcher,
            logbook,
            pending_logs: Mutex::new(JoinSet::new()),
        }
    }

    /// Assemble a tutor from configuration and already-built collaborators.
    ///
    /// `model` is the resolved model name (never `auto`).
    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        logbook: Arc<dyn Logbook>,
    ) -> Self {
        let dispatcher = RequestDispatcher::new(provider, model, &config.fallback_reply)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens);
        Self::new(config.persona.clone(), dispatcher, logbook)
    }

    pub fn persona(&self) -> &PersonaConfig {
        &self.persona
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    pub fn logbook_name(&self) -> &str {
        self.logbook.name()
    }

    /// Accept the student's name, moving the session to chatting.
    pub fn submit_name(&self, session: &mut Session, name: &str) -> Result<SessionStarted, SessionError> {
        let student_name = session.start(name)?;
        info!(session = %session.id(), "Session started");

        Ok(SessionStarted {
            session_id: session.id().clone(),
            greeting: self.persona.greeting(&student_name),
            student_name,
        })
    }

    /// Answer one student message.
    ///
    /// Model failures come back as [`Reply::Fallback`], never as errors; the
    /// exchange is recorded either way. Errors only signal host misuse.
    pub async fn submit_message(&self, session: &mut Session, text: &str) -> Result<Reply, SessionError> {
        let student_name = session
            .student_name()
            .ok_or(SessionError::NotStarted)?
            .to_string();
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let history = transcript::normalize(&self.persona, &student_name, session.turns());

        let student_turn = Turn::student(text);
        session.record(student_turn.clone())?;

        let reply = self.dispatcher.dispatch(history, text).await;

        let teacher_turn = Turn::teacher(reply.text());
        session.record(teacher_turn.clone())?;

        self.log_exchange(
            LogRow::from_turn(&student_name, &student_turn),
            LogRow::from_turn(&student_name, &teacher_turn),
        );

        debug!(
            session = %session.id(),
            turns = session.turns().len(),
            fallback = reply.is_fallback(),
            "Exchange recorded"
        );
        Ok(reply)
    }

    /// Wait for every spreadsheet write started so far.
    ///
    /// Dropping the tutor cancels unfinished writes, so short-lived hosts
    /// (the one-shot CLI) call this before exiting.
    pub async fn flush_logbook(&self) {
        let mut pending = std::mem::take(&mut *self.pending());
        while let Some(result) = pending.join_next().await {
            if let Err(e) = result {
                debug!(error = %e, "Logbook task ended early");
            }
        }
    }

    /// Append both rows of one exchange in the background, student row first.
    /// Failures are logged at debug level and dropped.
    fn log_exchange(&self, student_row: LogRow, teacher_row: LogRow) {
        let logbook = Arc::clone(&self.logbook);
        let mut pending = self.pending();

        // Reap writes that already finished
        while pending.try_join_next().is_some() {}

        pending.spawn(async move {
            for row in [student_row, teacher_row] {
                if let Err(e) = logbook.append(row).await {
                    debug!(logbook = %logbook.name(), error = %e, "Logbook append failed");
                }
            }
        });
    }

    fn pending(&self) -> std::sync::MutexGuard<'_, JoinSet<()>> {
        self.pending_logs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//! HTTP API v1: tutoring sessions.
//!
//! Endpoints:
//!
//! - `POST /v1/sessions`: submit the student's name, start a session
//! - `POST /v1/sessions/{id}/messages`: submit one message, get the tutor's reply
//! - `GET  /v1/sessions/{id}`: read a session's transcript

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use mathrelax_core::error::SessionError;
use mathrelax_core::message::Turn;
use mathrelax_core::session::{Session, SessionStarted};
use mathrelax_core::speech::speakable_text;
use mathrelax_tutor::Tutor;

// ── State ─────────────────────────────────────────────────────────────────

/// One resident session. The mutex serializes messages within the session.
struct SessionSlot {
    /// Activity tick of the last name or message submission
    last_active: AtomicU64,
    session: Arc<Mutex<Session>>,
}

/// Shared state for the v1 API.
pub struct ApiV1State {
    pub tutor: Arc<Tutor>,
    sessions: RwLock<HashMap<String, SessionSlot>>,
    max_sessions: usize,
    activity: AtomicU64,
}

impl ApiV1State {
    pub fn new(tutor: Arc<Tutor>, max_sessions: usize) -> Self {
        Self {
            tutor,
            sessions: RwLock::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
            activity: AtomicU64::new(0),
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn insert(&self, session: Session) {
        let mut sessions = self.sessions.write().await;

        // Evict the least recently active session if at capacity
        if sessions.len() >= self.max_sessions {
            if let Some(idle_key) = sessions
                .iter()
                .min_by_key(|(_, slot)| slot.last_active.load(Ordering::Relaxed))
                .map(|(k, _)| k.clone())
            {
                sessions.remove(&idle_key);
                debug!(session = %idle_key, "Evicted least recently active session");
            }
        }

        sessions.insert(
            session.id().to_string(),
            SessionSlot {
                last_active: AtomicU64::new(self.tick()),
                session: Arc::new(Mutex::new(session)),
            },
        );
    }

    async fn get(&self, id: &str) -> Option<Arc<Mutex<Session>>> {
        self.sessions
            .read()
            .await
            .get(id)
            .map(|slot| slot.session.clone())
    }

    /// Like [`get`](Self::get), and marks the session as just used.
    async fn get_active(&self, id: &str) -> Option<Arc<Mutex<Session>>> {
        let sessions = self.sessions.read().await;
        let slot = sessions.get(id)?;
        slot.last_active.store(self.tick(), Ordering::Relaxed);
        Some(slot.session.clone())
    }

    fn tick(&self) -> u64 {
        self.activity.fetch_add(1, Ordering::Relaxed) + 1
    }
}

pub type SharedApiState = Arc<ApiV1State>;

// ── Router ────────────────────────────────────────────────────────────────

/// Build the v1 API router. Nest this under "/v1" in the main router.
pub fn v1_router(state: SharedApiState) -> Router {
    Router::new()
        .route("/sessions", post(create_session_handler))
        .route("/sessions/{id}", get(get_session_handler))
        .route("/sessions/{id}/messages", post(message_handler))
        .with_state(state)
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct CreateSessionRequest {
    name: String,
}

#[derive(Deserialize)]
struct MessageRequest {
    text: String,
}

#[derive(Serialize, Deserialize)]
struct MessageResponse {
    reply: String,
    fallback: bool,
    /// Read-aloud text; absent for fallback replies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    speech: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct SessionDetailResponse {
    session_id: String,
    student_name: Option<String>,
    turns: Vec<Turn>,
}

#[derive(Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn session_error(e: SessionError) -> ApiError {
    let status = match e {
        SessionError::EmptyName | SessionError::EmptyMessage => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::NotStarted | SessionError::AlreadyStarted(_) => StatusCode::CONFLICT,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

fn not_found(id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Unknown session: {id}"),
        }),
    )
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn create_session_handler(
    State(state): State<SharedApiState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionStarted>), ApiError> {
    let mut session = Session::new();
    let started = state
        .tutor
        .submit_name(&mut session, &payload.name)
        .map_err(session_error)?;

    state.insert(session).await;
    info!(session = %started.session_id, "v1/sessions created");

    Ok((StatusCode::CREATED, Json(started)))
}

async fn message_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
    Json(payload): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let slot = state.get_active(&id).await.ok_or_else(|| not_found(&id))?;

    // Held across the model call: a second message for this session waits.
    let mut session = slot.lock().await;
    let reply = state
        .tutor
        .submit_message(&mut session, &payload.text)
        .await
        .map_err(session_error)?;

    let speech = (!reply.is_fallback())
        .then(|| speakable_text(reply.text()))
        .filter(|s| !s.is_empty());

    Ok(Json(MessageResponse {
        fallback: reply.is_fallback(),
        reply: reply.text().to_string(),
        speech,
    }))
}

async fn get_session_handler(
    State(state): State<SharedApiState>,
    Path(id): Path<String>,
) -> Result<Json<SessionDetailResponse>, ApiError> {
    let slot = state.get(&id).await.ok_or_else(|| not_found(&id))?;
    let session = slot.lock().await;

    Ok(Json(SessionDetailResponse {
        session_id: session.id().to_string(),
        student_name: session.student_name().map(String::from),
        turns: session.turns().to_vec(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use mathrelax_core::error::ProviderError;
    use mathrelax_core::message::Speaker;
    use mathrelax_core::provider::{Provider, ProviderRequest, ProviderResponse};
    use mathrelax_tutor::RequestDispatcher;

    const FALLBACK: &str = "Yah, sinyalnya putus. Coba tanya lagi ya!";

    /// Lightweight mock provider for gateway tests.
    struct MockProvider {
        response: Result<String, ProviderError>,
    }

    #[async_trait::async_trait]
    impl Provider for MockProvider {
        fn name(&self) -> &str {
            "gateway_mock"
        }

        async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            let text = self.response.clone()?;
            Ok(ProviderResponse {
                text,
                usage: None,
                model: request.model,
            })
        }
    }

    fn test_api_state_with(response: Result<String, ProviderError>, max_sessions: usize) -> SharedApiState {
        let provider = Arc::new(MockProvider { response });
        let dispatcher = RequestDispatcher::new(provider, "mock-model", FALLBACK);
        let tutor = Tutor::new(
            mathrelax_core::PersonaConfig::default(),
            dispatcher,
            Arc::new(mathrelax_logbook::NoopLogbook),
        );
        Arc::new(ApiV1State::new(Arc::new(tutor), max_sessions))
    }

    fn test_api_state() -> SharedApiState {
        test_api_state_with(Ok("Coba samakan penyebutnya dulu.".into()), 10)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    async fn create_session(state: &SharedApiState, name: &str) -> String {
        let response = v1_router(state.clone())
            .oneshot(post_json("/sessions", serde_json::json!({ "name": name })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let started: serde_json::Value = body_json(response).await;
        started["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn create_session_greets_student() {
        let app = v1_router(test_api_state());

        let response = app
            .oneshot(post_json("/sessions", serde_json::json!({ "name": "Budi" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json: serde_json::Value = body_json(response).await;
        assert_eq!(json["student_name"], "Budi");
        assert!(json["greeting"].as_str().unwrap().contains("Halo Budi!"));
        assert!(!json["session_id"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_name_is_unprocessable() {
        let state = test_api_state();
        let app = v1_router(state.clone());

        let response = app
            .oneshot(post_json("/sessions", serde_json::json!({ "name": "  " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(state.session_count().await, 0);
    }

    #[tokio::test]
    async fn message_round_trip() {
        let state = test_api_state();
        let id = create_session(&state, "Budi").await;

        let response = v1_router(state.clone())
            .oneshot(post_json(
                &format!("/sessions/{id}/messages"),
                serde_json::json!({ "text": "1/2 + 1/3 berapa?" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let reply: MessageResponse = body_json(response).await;
        assert_eq!(reply.reply, "Coba samakan penyebutnya dulu.");
        assert!(!reply.fallback);
        assert_eq!(reply.speech.as_deref(), Some("Coba samakan penyebutnya dulu."));

        let response = v1_router(state)
            .oneshot(
                Request::builder()
                    .uri(format!("/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let detail: SessionDetailResponse = body_json(response).await;
        assert_eq!(detail.student_name.as_deref(), Some("Budi"));
        assert_eq!(detail.turns.len(), 2);
        assert_eq!(detail.turns[0].speaker, Speaker::Student);
        assert_eq!(detail.turns[1].speaker, Speaker::Teacher);
    }

    #[tokio::test]
    async fn provider_failure_is_flagged_fallback() {
        let state = test_api_state_with(Err(ProviderError::Network("down".into())), 10);
        let id = create_session(&state, "Budi").await;

        let response = v1_router(state)
            .oneshot(post_json(
                &format!("/sessions/{id}/messages"),
                serde_json::json!({ "text": "halo" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let reply: MessageResponse = body_json(response).await;
        assert!(reply.fallback);
        assert_eq!(reply.reply, FALLBACK);
        assert_eq!(reply.speech, None);
    }

    #[tokio::test]
    async fn blank_message_is_unprocessable() {
        let state = test_api_state();
        let id = create_session(&state, "Budi").await;

        let response = v1_router(state)
            .oneshot(post_json(
                &format!("/sessions/{id}/messages"),
                serde_json::json!({ "text": " " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unknown_session_not_found() {
        let app = v1_router(test_api_state());

        let response = app
            .oneshot(post_json(
                "/sessions/nonexistent/messages",
                serde_json::json!({ "text": "halo" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    async fn send_message(state: &SharedApiState, id: &str, text: &str) -> StatusCode {
        v1_router(state.clone())
            .oneshot(post_json(
                &format!("/sessions/{id}/messages"),
                serde_json::json!({ "text": text }),
            ))
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn idle_session_is_evicted_first() {
        let state = test_api_state_with(Ok("ok".into()), 2);
        let ani = create_session(&state, "Ani").await;
        let budi = create_session(&state, "Budi").await;

        // Ani is older but still chatting; Budi went quiet
        assert_eq!(send_message(&state, &ani, "1/2 + 1/4?").await, StatusCode::OK);
        create_session(&state, "Citra").await;

        assert_eq!(state.session_count().await, 2);
        assert!(state.get(&budi).await.is_none());
        assert_eq!(send_message(&state, &ani, "3/4?").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn oldest_untouched_session_is_evicted() {
        let state = test_api_state_with(Ok("ok".into()), 2);
        let first = create_session(&state, "Ani").await;
        create_session(&state, "Budi").await;
        create_session(&state, "Citra").await;

        assert_eq!(state.session_count().await, 2);
        assert!(state.get(&first).await.is_none());
    }

    #[tokio::test]
    async fn markdown_reply_is_cleaned_for_speech() {
        let state = test_api_state_with(Ok("**Bagus!** Coba lagi ya.".into()), 10);
        let id = create_session(&state, "Budi").await;

        let response = v1_router(state)
            .oneshot(post_json(
                &format!("/sessions/{id}/messages"),
                serde_json::json!({ "text": "1/2" }),
            ))
            .await
            .unwrap();
        let reply: MessageResponse = body_json(response).await;
        assert_eq!(reply.reply, "**Bagus!** Coba lagi ya.");
        assert_eq!(reply.speech.as_deref(), Some("Bagus! Coba lagi ya."));
    }
}

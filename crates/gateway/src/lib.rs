//! HTTP gateway for Math Relax.
//!
//! Exposes a health check, the v1 session API, and the embedded chat page.
//!
//! Built on Axum; one shared [`Tutor`] serves every session.

pub mod api_v1;
pub mod frontend;

use axum::extract::DefaultBodyLimit;
use axum::{Router, response::Json, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use mathrelax_config::AppConfig;
use mathrelax_tutor::Tutor;

/// Build the full router: health, v1 API and frontend.
///
/// Layers applied:
/// - Request body size limit (64 KB)
/// - HTTP trace logging
pub fn build_router(api_state: api_v1::SharedApiState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/v1", api_v1::v1_router(api_state))
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Build the tutor once from configuration.
///
/// Fails when no API key is available or when `model = "auto"` finds no
/// usable model.
pub async fn build_tutor(config: &AppConfig) -> Result<Tutor, Box<dyn std::error::Error>> {
    let provider = mathrelax_providers::build_from_config(config)?;
    let model = mathrelax_providers::select::resolve_model(provider.as_ref(), &config.model).await?;
    let logbook = mathrelax_logbook::build_from_config(config);

    info!(provider = %provider.name(), model = %model, logbook = %logbook.name(), "Tutor ready");
    Ok(Tutor::from_config(config, provider, model, logbook))
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let host = config.gateway.host.clone();
    let port = config.gateway.port;
    let addr = format!("{host}:{port}");

    let tutor = Arc::new(build_tutor(&config).await?);
    let api_state = Arc::new(api_v1::ApiV1State::new(tutor, config.gateway.max_sessions));
    let app = build_router(api_state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

//! HTTP chat surface.
//!
//! A thin adapter over the conversation loop: `POST /api/chat` runs one
//! turn, `POST /api/chat/reset` drops a session's history, `GET /` serves
//! the embedded chat widget. Session histories live in memory only, one
//! independently owned history per session id.

pub mod types;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::sync::{Mutex, RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::agent::{Agent, ChatSession};
use crate::config::Config;
use crate::error::Error;

use types::{ChatRequest, ChatResponse, ErrorResponse, HealthResponse, ResetRequest};

/// Shared server state.
pub struct AppState {
    agent: Agent,
    /// Per-session histories. Each session is behind its own lock so one
    /// long turn never blocks other users.
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<ChatSession>>>>,
}

impl AppState {
    pub fn new(agent: Agent) -> Self {
        Self {
            agent,
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

/// Build the router with all routes and middleware.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/chat", post(chat))
        .route("/api/chat/reset", post(reset))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server with the production agent.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let agent = crate::build_agent(&config);
    let state = Arc::new(AppState::new(agent));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(include_str!("chat.html"))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError(
            StatusCode::BAD_REQUEST,
            "message must not be empty".to_string(),
        ));
    }

    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);

    let session = {
        let mut sessions = state.sessions.write().await;
        sessions
            .entry(session_id)
            .or_insert_with(|| Arc::new(Mutex::new(ChatSession::new())))
            .clone()
    };

    let mut session = session.lock().await;

    let reply = match state.agent.run_turn(&mut session, &request.message).await {
        Ok(reply) => reply,
        // The loop failed closed; tell the user instead of dropping the session.
        Err(Error::BoundExceeded { limit }) => format!(
            "Sorry, I could not reach an answer within {} data lookups. \
             Try narrowing the question.",
            limit
        ),
        Err(e) => {
            tracing::error!(session = %session_id, "chat turn failed: {}", e);
            return Err(ApiError(StatusCode::BAD_GATEWAY, format!("{}", e)));
        }
    };

    Ok(Json(ChatResponse { session_id, reply }))
}

async fn reset(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResetRequest>,
) -> StatusCode {
    state.sessions.write().await.remove(&request.session_id);
    StatusCode::NO_CONTENT
}

/// Handler error: a status code plus a JSON error body.
pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError(status, error) = self;
        (status, Json(ErrorResponse { error })).into_response()
    }
}

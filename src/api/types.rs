//! API request and response types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to run one chat turn.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// Session to continue; omit to start a new one
    pub session_id: Option<Uuid>,

    /// The user's message
    pub message: String,
}

/// Response carrying the assistant's reply.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    /// Session identifier (echo it back to continue the conversation)
    pub session_id: Uuid,

    /// The assistant's reply text
    pub reply: String,
}

/// Request to clear one session's history.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetRequest {
    pub session_id: Uuid,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Error body for non-success responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

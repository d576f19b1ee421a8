//! Conversation HTTP handlers.
//!
//! Endpoints:
//! - POST /start_conversation/   - Start or reset a session (query `session_id`)
//! - POST /send_message/         - Send a user message (form `session_id`, `message`)
//! - GET  /conversation_history/ - Full transcript (query `session_id`)
//!
//! Extractor rejections (wrong content type, undecodable fields) are
//! reported as validation errors like any other missing input.

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::http::error::AppError;
use crate::http::handlers::required;
use crate::state::AppState;

/// Query parameters naming a session.
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session_id: Option<String>,
}

/// Form body for send-message.
#[derive(Debug, Deserialize)]
pub struct SendMessageForm {
    pub session_id: Option<String>,
    pub message: Option<String>,
}

/// POST /start_conversation/
pub async fn start_conversation(
    State(state): State<AppState>,
    query: Result<Query<SessionQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query?;
    let session_id = required("session_id", query.session_id)?;
    state.chat_service.start_conversation(&session_id);

    Ok(Json(json!({
        "status": "started",
        "session_id": session_id,
    })))
}

/// POST /send_message/
///
/// If the client disconnects, axum drops this future; the user turn stays
/// recorded and no assistant turn is appended.
pub async fn send_message(
    State(state): State<AppState>,
    form: Result<Form<SendMessageForm>, FormRejection>,
) -> Result<Json<Value>, AppError> {
    let Form(form) = form?;
    let session_id = required("session_id", form.session_id)?;
    let message = required("message", form.message)?;

    let reply = state
        .chat_service
        .send_message(&session_id, &message)
        .await?;

    Ok(Json(json!({ "response": reply })))
}

/// GET /conversation_history/
pub async fn conversation_history(
    State(state): State<AppState>,
    query: Result<Query<SessionQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query?;
    let session_id = required("session_id", query.session_id)?;
    let history = state.chat_service.history(&session_id)?;

    Ok(Json(json!({ "history": history })))
}

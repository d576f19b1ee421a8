//! Application error type mapping to HTTP status codes and JSON bodies.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use parlance_types::error::{ChatError, ConversationError, ModelError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// The session was never started.
    UnknownSession(String),
    /// A required input is missing or empty.
    Validation(String),
    /// Switching the model failed.
    InvalidModel(ModelError),
    /// The model call failed.
    Model(ModelError),
    /// Reading the multipart body failed.
    Upload(MultipartError),
}

impl From<ConversationError> for AppError {
    fn from(e: ConversationError) -> Self {
        match e {
            ConversationError::UnknownSession(id) => AppError::UnknownSession(id),
        }
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::Conversation(e) => e.into(),
            ChatError::Model(e) => AppError::Model(e),
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(e: FormRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Upload(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::UnknownSession(id) => {
                tracing::debug!(session_id = %id, "Rejected unknown session");
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": "Invalid session_id" }),
                )
            }
            AppError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, json!({ "detail": msg }))
            }
            AppError::InvalidModel(e) => {
                (StatusCode::BAD_REQUEST, json!({ "detail": e.to_string() }))
            }
            AppError::Model(e) => {
                tracing::error!(error = %e, "Model call failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": e.to_string() }),
                )
            }
            AppError::Upload(e) => {
                // An oversized body keeps its 413; anything else is a read failure.
                let status = match e.status() {
                    StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                tracing::warn!(error = %e, "Upload failed");
                (status, json!({ "detail": e.body_text() }))
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unknown_session_maps_to_400() {
        let err: AppError = ChatError::Conversation(ConversationError::UnknownSession(
            "ghost".to_string(),
        ))
        .into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid session_id" }));
    }

    #[tokio::test]
    async fn model_failure_maps_to_500() {
        let err: AppError = ChatError::Model(ModelError::Timeout).into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "request timed out");
    }

    #[tokio::test]
    async fn validation_maps_to_422() {
        let (status, body) = body_json(AppError::Validation("message is required".into())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "message is required");
    }

    #[tokio::test]
    async fn invalid_model_maps_to_400() {
        let err = AppError::InvalidModel(ModelError::InvalidModel("gpt-x".into()));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "invalid model: gpt-x");
    }
}

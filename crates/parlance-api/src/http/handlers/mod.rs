//! HTTP request handlers grouped by resource.

pub mod conversation;
pub mod model;
pub mod upload;

use axum::Json;
use serde_json::{Value, json};

use crate::http::error::AppError;

/// GET / - Welcome message.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Web-based Chat Assistant API" }))
}

/// GET /health - Liveness check.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Unwrap a required input, rejecting absent or empty values.
///
/// Whitespace is content: `" "` is a valid session id or message.
pub(crate) fn required(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{field} is required"))),
    }
}

//! Model selection HTTP handlers.
//!
//! Endpoints:
//! - POST /select_model/ - Switch the backend model (form `model_name`)
//! - GET  /model/        - Current provider, model, and allow-list

use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{Value, json};

use parlance_types::llm::ModelInfo;

use crate::http::error::AppError;
use crate::http::handlers::required;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SelectModelForm {
    pub model_name: Option<String>,
}

/// POST /select_model/
///
/// Applies to model calls that start after this returns.
pub async fn select_model(
    State(state): State<AppState>,
    form: Result<Form<SelectModelForm>, FormRejection>,
) -> Result<Json<Value>, AppError> {
    let Form(form) = form?;
    let model_name = required("model_name", form.model_name)?;

    state
        .chat_service
        .select_model(&model_name)
        .map_err(AppError::InvalidModel)?;

    Ok(Json(json!({
        "status": "model switched",
        "model": model_name,
    })))
}

/// GET /model/
pub async fn current_model(State(state): State<AppState>) -> Json<ModelInfo> {
    Json(state.chat_service.model_info())
}

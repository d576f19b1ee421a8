//! ModelBackend trait definition.
//!
//! This is the boundary to the language-model service: send a transcript,
//! get text back, and switch the model used for later calls.

use std::future::Future;

use parlance_types::chat::Turn;
use parlance_types::error::ModelError;

/// Trait for language-model backends.
///
/// Uses native async fn in traits for `chat`. `set_model` takes `&self`:
/// implementations keep the current model behind interior mutability so a
/// shared backend can be switched while other calls are in flight. A switch
/// affects calls that start after it; calls already running keep the model
/// they started with.
///
/// Implementations live in parlance-infra (e.g., `OpenAiCompatibleBackend`).
pub trait ModelBackend: Send + Sync {
    /// Human-readable backend name (e.g., "openai", "ollama").
    fn name(&self) -> &str;

    /// Model used by the next `chat` call.
    fn current_model(&self) -> String;

    /// Models `set_model` accepts. Empty means any non-empty name.
    fn available_models(&self) -> Vec<String>;

    /// Switch the model for subsequent calls.
    ///
    /// Fails with [`ModelError::InvalidModel`] for names the backend does
    /// not accept; the current model is unchanged in that case.
    fn set_model(&self, name: &str) -> Result<(), ModelError>;

    /// Generate the next assistant reply for a transcript.
    fn chat(&self, transcript: &[Turn]) -> impl Future<Output = Result<String, ModelError>> + Send;
}

/// Validate a model name against an allow-list.
///
/// Empty or whitespace-only names are always rejected. An empty allow-list
/// accepts any other name.
pub fn check_model_name(name: &str, allowed: &[String]) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::InvalidModel("model name must not be empty".to_string()));
    }
    if !allowed.is_empty() && !allowed.iter().any(|m| m == name) {
        return Err(ModelError::InvalidModel(format!(
            "'{name}' is not one of: {}",
            allowed.join(", ")
        )));
    }
    Ok(())
}

//! Model backend descriptors exposed over the API.

use serde::{Deserialize, Serialize};

/// Snapshot of the backend's current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Backend name (e.g. "openai", "ollama").
    pub provider: String,
    /// Model currently used for new chat calls.
    pub model: String,
    /// Models `select_model` accepts. Empty means any non-empty name.
    pub available: Vec<String>,
}

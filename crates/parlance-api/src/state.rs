//! Application state wiring the store, chat service, and configuration.
//!
//! The conversation store is created here at startup and shared through
//! `Arc`; handlers reach it via axum `State`.

use std::sync::Arc;

use parlance_core::chat::service::ChatService;
use parlance_core::conversation::store::ConversationStore;
use parlance_core::llm::box_backend::BoxModelBackend;
use parlance_infra::llm::create_backend;
use parlance_types::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ChatService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build the model backend from config and wire the chat service.
    pub fn init(config: AppConfig) -> anyhow::Result<Self> {
        let backend = create_backend(&config.model)?;
        Ok(Self::with_backend(config, backend))
    }

    /// Wire state around an already-built backend.
    pub fn with_backend(config: AppConfig, backend: BoxModelBackend) -> Self {
        let store = Arc::new(ConversationStore::new());
        Self {
            chat_service: Arc::new(ChatService::new(store, backend)),
            config: Arc::new(config),
        }
    }
}

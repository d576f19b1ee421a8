//! Chat service orchestrating the send-message flow.
//!
//! `ChatService` ties the conversation store to a model backend:
//! append the user turn, call the model with no store lock held, append the
//! assistant turn. Send-message calls on one session are queued behind that
//! session's single-flight lock, so user and assistant turns always
//! alternate in the transcript even under concurrent requests.

use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span, warn};

use parlance_types::chat::Turn;
use parlance_types::error::{ChatError, ConversationError, ModelError};
use parlance_types::llm::ModelInfo;

use crate::conversation::store::ConversationStore;
use crate::llm::box_backend::BoxModelBackend;

/// Orchestrates conversations between callers and the model backend.
pub struct ChatService {
    store: Arc<ConversationStore>,
    backend: BoxModelBackend,
}

impl ChatService {
    /// Create a chat service over a store and a backend.
    pub fn new(store: Arc<ConversationStore>, backend: BoxModelBackend) -> Self {
        Self { store, backend }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Start (or reset) the conversation for `session_id`.
    pub fn start_conversation(&self, session_id: &str) {
        if self.store.start(session_id) {
            info!(session_id, "Conversation reset");
        } else {
            info!(session_id, "Conversation started");
        }
    }

    /// Send a user message and return the model's reply.
    ///
    /// The user turn is recorded before the model is called and stays in the
    /// transcript if the call fails, so the transcript then ends on a user
    /// turn. If the session is reset while the model is generating, the reply
    /// is still returned but not recorded.
    pub async fn send_message(&self, session_id: &str, message: &str) -> Result<String, ChatError> {
        let session = self.store.session(session_id)?;
        let _flight = session.begin_flight().await;

        let (epoch, transcript) = session.push_and_snapshot(Turn::user(message));

        let span = info_span!(
            "gen_ai.chat",
            gen_ai.system = self.backend.name(),
            gen_ai.request.model = %self.backend.current_model(),
            session_id,
            transcript_turns = transcript.len(),
        );

        let reply = match self.backend.chat(&transcript).instrument(span).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(session_id, error = %e, "Model call failed; user turn kept");
                return Err(e.into());
            }
        };

        if session.push_if_epoch(epoch, Turn::assistant(reply.clone())) {
            debug!(session_id, reply_len = reply.len(), "Assistant turn recorded");
        } else {
            warn!(session_id, "Session was reset during generation; reply not recorded");
        }

        Ok(reply)
    }

    /// Full transcript for `session_id`.
    pub fn history(&self, session_id: &str) -> Result<Vec<Turn>, ConversationError> {
        self.store.read(session_id)
    }

    /// Switch the backend model for subsequent calls.
    pub fn select_model(&self, name: &str) -> Result<(), ModelError> {
        let previous = self.backend.current_model();
        self.backend.set_model(name)?;
        info!(from = %previous, to = %name, "Model switched");
        Ok(())
    }

    /// Current backend selection.
    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: self.backend.name().to_string(),
            model: self.backend.current_model(),
            available: self.backend.available_models(),
        }
    }
}

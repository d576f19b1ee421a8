use thiserror::Error;

/// Errors from the conversation store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    #[error("unknown session '{0}'")]
    UnknownSession(String),
}

/// Errors from a model backend.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("provider returned an empty response")]
    EmptyResponse,

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("request timed out")]
    Timeout,

    #[error("invalid model: {0}")]
    InvalidModel(String),
}

/// Errors from the send-message flow, which touches both the store and the
/// backend.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Conversation(#[from] ConversationError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

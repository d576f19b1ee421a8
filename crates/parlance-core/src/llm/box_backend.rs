//! BoxModelBackend -- object-safe dynamic dispatch wrapper for ModelBackend.
//!
//! 1. Define an object-safe `ModelBackendDyn` trait with a boxed future
//! 2. Blanket-impl `ModelBackendDyn` for all `T: ModelBackend`
//! 3. `BoxModelBackend` wraps `Box<dyn ModelBackendDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use parlance_types::chat::Turn;
use parlance_types::error::ModelError;

use super::backend::ModelBackend;

/// Object-safe version of [`ModelBackend`] with a boxed `chat` future.
pub trait ModelBackendDyn: Send + Sync {
    fn name(&self) -> &str;

    fn current_model(&self) -> String;

    fn available_models(&self) -> Vec<String>;

    fn set_model(&self, name: &str) -> Result<(), ModelError>;

    fn chat_boxed<'a>(
        &'a self,
        transcript: &'a [Turn],
    ) -> Pin<Box<dyn Future<Output = Result<String, ModelError>> + Send + 'a>>;
}

impl<T: ModelBackend> ModelBackendDyn for T {
    fn name(&self) -> &str {
        ModelBackend::name(self)
    }

    fn current_model(&self) -> String {
        ModelBackend::current_model(self)
    }

    fn available_models(&self) -> Vec<String> {
        ModelBackend::available_models(self)
    }

    fn set_model(&self, name: &str) -> Result<(), ModelError> {
        ModelBackend::set_model(self, name)
    }

    fn chat_boxed<'a>(
        &'a self,
        transcript: &'a [Turn],
    ) -> Pin<Box<dyn Future<Output = Result<String, ModelError>> + Send + 'a>> {
        Box::pin(self.chat(transcript))
    }
}

/// Type-erased model backend for runtime backend selection.
///
/// `ModelBackend` uses an RPITIT `chat`, so it cannot be a trait object
/// directly; this wrapper exposes the same methods over `ModelBackendDyn`.
pub struct BoxModelBackend {
    inner: Box<dyn ModelBackendDyn + Send + Sync>,
}

impl BoxModelBackend {
    /// Wrap a concrete `ModelBackend` in a type-erased box.
    pub fn new<T: ModelBackend + 'static>(backend: T) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn current_model(&self) -> String {
        self.inner.current_model()
    }

    pub fn available_models(&self) -> Vec<String> {
        self.inner.available_models()
    }

    pub fn set_model(&self, name: &str) -> Result<(), ModelError> {
        self.inner.set_model(name)
    }

    /// Generate the next assistant reply for a transcript.
    pub async fn chat(&self, transcript: &[Turn]) -> Result<String, ModelError> {
        self.inner.chat_boxed(transcript).await
    }
}

//! OpenAI-compatible model backend.
//!
//! A single [`OpenAiCompatibleBackend`] serves OpenAI, Google Gemini,
//! Mistral, GLM, Ollama, and any other server that speaks the chat
//! completions protocol, selected by base URL.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building the `Authorization` header.

pub mod config;
pub mod types;

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use parlance_core::llm::backend::{ModelBackend, check_model_name};
use parlance_types::chat::Turn;
use parlance_types::error::ModelError;

use self::config::OpenAiCompatConfig;
use self::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// Backend for any OpenAI-compatible chat completions API.
///
/// Does NOT derive Debug so the API key can never end up in logs.
pub struct OpenAiCompatibleBackend {
    client: reqwest::Client,
    provider_name: String,
    base_url: String,
    api_key: Option<SecretString>,
    model: RwLock<String>,
    allowed_models: Vec<String>,
    max_tokens: u32,
    temperature: Option<f64>,
    system_prompt: Option<String>,
}

impl OpenAiCompatibleBackend {
    /// Create a backend from a configuration.
    ///
    /// Fails if the startup model is not in the allow-list or the HTTP client
    /// cannot be built.
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, ModelError> {
        check_model_name(&config.model, &config.allowed_models)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            provider_name: config.provider_name,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            model: RwLock::new(config.model),
            allowed_models: config.allowed_models,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            system_prompt: config.system_prompt,
        })
    }

    /// Full URL of the chat completions endpoint.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Convert a transcript into a request for `model`.
    ///
    /// The configured system prompt, if any, goes first; it is never part of
    /// the stored transcript.
    fn build_request(&self, transcript: &[Turn], model: String) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(transcript.len() + 1);

        if let Some(system) = &self.system_prompt {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }

        messages.extend(transcript.iter().map(|turn| ChatMessage {
            role: turn.role.to_string(),
            content: turn.content.clone(),
        }));

        ChatCompletionRequest {
            model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream: false,
        }
    }
}

/// Pull the reply text out of a completion response.
fn extract_reply(response: ChatCompletionResponse) -> Result<String, ModelError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(ModelError::EmptyResponse)?;

    if let Some(reason) = choice.finish_reason.as_deref() {
        if reason == "length" {
            tracing::debug!("Completion truncated at max_tokens");
        }
    }

    match choice.message.content {
        Some(content) if !content.is_empty() => Ok(content),
        _ => Err(ModelError::EmptyResponse),
    }
}

/// Map a non-success HTTP status to a [`ModelError`].
fn map_status(status: reqwest::StatusCode, retry_after: Option<u64>, body: String) -> ModelError {
    match status.as_u16() {
        401 | 403 => ModelError::AuthenticationFailed,
        429 => ModelError::RateLimited {
            retry_after_ms: retry_after.map(|secs| secs * 1000),
        },
        _ => ModelError::Provider {
            message: format!("HTTP {status}: {body}"),
        },
    }
}

fn map_transport_error(e: reqwest::Error) -> ModelError {
    if e.is_timeout() {
        ModelError::Timeout
    } else {
        ModelError::Provider {
            message: format!("HTTP request failed: {e}"),
        }
    }
}

impl ModelBackend for OpenAiCompatibleBackend {
    fn name(&self) -> &str {
        &self.provider_name
    }

    fn current_model(&self) -> String {
        self.model
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn available_models(&self) -> Vec<String> {
        self.allowed_models.clone()
    }

    fn set_model(&self, name: &str) -> Result<(), ModelError> {
        check_model_name(name, &self.allowed_models)?;
        *self.model.write().unwrap_or_else(PoisonError::into_inner) = name.to_string();
        Ok(())
    }

    async fn chat(&self, transcript: &[Turn]) -> Result<String, ModelError> {
        let body = self.build_request(transcript, self.current_model());

        let mut request = self.client.post(self.completions_url()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await.map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_status(status, retry_after, error_body));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            ModelError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                model = completion.model.as_deref().unwrap_or(""),
                input_tokens = usage.prompt_tokens,
                output_tokens = usage.completion_tokens,
                "Completion received"
            );
        }

        extract_reply(completion)
    }
}

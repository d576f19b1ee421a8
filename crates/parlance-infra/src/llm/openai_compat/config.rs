//! Configuration and per-provider defaults for OpenAI-compatible backends.
//!
//! Each service that speaks the OpenAI chat completions protocol gets a
//! preset with its base URL and the environment variable its API key is
//! conventionally stored in.

use secrecy::SecretString;

use parlance_types::config::{ModelConfig, ProviderKind};
use parlance_types::error::ModelError;

/// Everything needed to construct an [`super::OpenAiCompatibleBackend`].
///
/// Does not derive Debug: it carries the API key.
pub struct OpenAiCompatConfig {
    /// Human-readable backend name (e.g., "openai", "ollama").
    pub provider_name: String,
    /// Base URL for the API, without the `/chat/completions` suffix.
    pub base_url: String,
    /// API key; `None` for local servers that need no auth.
    pub api_key: Option<SecretString>,
    /// Model selected at startup.
    pub model: String,
    /// Models `set_model` accepts. Empty accepts any non-empty name.
    pub allowed_models: Vec<String>,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    pub timeout_secs: u64,
    pub system_prompt: Option<String>,
}

/// Static facts about a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderPreset {
    /// Default base URL; `None` means the user must supply one.
    pub base_url: Option<&'static str>,
    /// Conventional API key variable.
    pub api_key_env: &'static str,
    /// Whether a call without a key is expected to fail.
    pub requires_key: bool,
}

/// Preset for each known provider.
pub fn preset(kind: ProviderKind) -> ProviderPreset {
    match kind {
        ProviderKind::OpenAi => ProviderPreset {
            base_url: Some("https://api.openai.com/v1"),
            api_key_env: "OPENAI_API_KEY",
            requires_key: true,
        },
        ProviderKind::Gemini => ProviderPreset {
            base_url: Some("https://generativelanguage.googleapis.com/v1beta/openai"),
            api_key_env: "GEMINI_API_KEY",
            requires_key: true,
        },
        ProviderKind::Mistral => ProviderPreset {
            base_url: Some("https://api.mistral.ai/v1"),
            api_key_env: "MISTRAL_API_KEY",
            requires_key: true,
        },
        ProviderKind::Glm => ProviderPreset {
            base_url: Some("https://api.z.ai/api/paas/v4"),
            api_key_env: "GLM_API_KEY",
            requires_key: true,
        },
        ProviderKind::Ollama => ProviderPreset {
            base_url: Some("http://localhost:11434/v1"),
            api_key_env: "OLLAMA_API_KEY",
            requires_key: false,
        },
        ProviderKind::Custom => ProviderPreset {
            base_url: None,
            api_key_env: "PARLANCE_API_KEY",
            requires_key: false,
        },
    }
}

impl OpenAiCompatConfig {
    /// Build a backend config from the `[model]` table and a resolved key.
    ///
    /// Fails when no base URL is known: a `custom` provider without
    /// `base_url`.
    pub fn from_model_config(
        config: &ModelConfig,
        api_key: Option<SecretString>,
    ) -> Result<Self, ModelError> {
        let base_url = config
            .base_url
            .clone()
            .or_else(|| preset(config.provider).base_url.map(str::to_string))
            .ok_or_else(|| ModelError::Provider {
                message: format!("provider '{}' requires model.base_url", config.provider),
            })?;

        Ok(Self {
            provider_name: config.provider.to_string(),
            base_url,
            api_key,
            model: config.model.clone(),
            allowed_models: config.allowed_models.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
            system_prompt: config.system_prompt.clone(),
        })
    }
}

//! Model backend implementations.
//!
//! [`create_backend`] turns the `[model]` configuration table into a
//! [`BoxModelBackend`], resolving the API key from the environment.

pub mod openai_compat;

use secrecy::SecretString;

use parlance_core::llm::box_backend::BoxModelBackend;
use parlance_types::config::ModelConfig;
use parlance_types::error::ModelError;

use self::openai_compat::OpenAiCompatibleBackend;
use self::openai_compat::config::{OpenAiCompatConfig, preset};

/// Create a [`BoxModelBackend`] from the `[model]` configuration table.
///
/// The API key is read from the variable named by `api_key_env`, or the
/// provider's conventional variable when that is unset.
///
/// # Errors
///
/// Returns [`ModelError::AuthenticationFailed`] if the provider requires a
/// key and none is set, or any error from building the backend.
pub fn create_backend(config: &ModelConfig) -> Result<BoxModelBackend, ModelError> {
    create_backend_with(config, |var| std::env::var(var).ok())
}

/// [`create_backend`] with an injectable variable lookup.
fn create_backend_with(
    config: &ModelConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<BoxModelBackend, ModelError> {
    let preset = preset(config.provider);
    let key_var = config.api_key_env.as_deref().unwrap_or(preset.api_key_env);

    let api_key = lookup(key_var)
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from);

    if api_key.is_none() {
        if preset.requires_key {
            tracing::error!(provider = %config.provider, var = key_var, "API key not set");
            return Err(ModelError::AuthenticationFailed);
        }
        tracing::debug!(provider = %config.provider, "No API key; sending unauthenticated requests");
    }

    let backend_config = OpenAiCompatConfig::from_model_config(config, api_key)?;
    let backend = OpenAiCompatibleBackend::new(backend_config)?;

    tracing::info!(
        provider = %config.provider,
        model = %config.model,
        "Model backend ready"
    );
    Ok(BoxModelBackend::new(backend))
}

#[cfg(test)]
mod tests {
    use parlance_types::config::ProviderKind;

    use super::*;

    #[test]
    fn hosted_provider_without_key_fails() {
        let config = ModelConfig::default();
        let result = create_backend_with(&config, |_| None);
        assert!(matches!(result, Err(ModelError::AuthenticationFailed)));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = ModelConfig::default();
        let result = create_backend_with(&config, |_| Some("   ".to_string()));
        assert!(matches!(result, Err(ModelError::AuthenticationFailed)));
    }

    #[test]
    fn key_is_read_from_configured_variable() {
        let config = ModelConfig {
            api_key_env: Some("MY_PROXY_KEY".to_string()),
            ..ModelConfig::default()
        };
        let backend = create_backend_with(&config, |var| {
            (var == "MY_PROXY_KEY").then(|| "sk-test".to_string())
        })
        .unwrap();
        assert_eq!(backend.name(), "openai");
        assert_eq!(backend.current_model(), config.model);
    }

    #[test]
    fn ollama_needs_no_key() {
        let config = ModelConfig {
            provider: ProviderKind::Ollama,
            model: "llama3.2".to_string(),
            ..ModelConfig::default()
        };
        let backend = create_backend_with(&config, |_| None).unwrap();
        assert_eq!(backend.name(), "ollama");
        assert_eq!(backend.current_model(), "llama3.2");
    }

    #[test]
    fn custom_provider_requires_base_url() {
        let config = ModelConfig {
            provider: ProviderKind::Custom,
            ..ModelConfig::default()
        };
        let result = create_backend_with(&config, |_| None);
        assert!(matches!(result, Err(ModelError::Provider { .. })));
    }
}

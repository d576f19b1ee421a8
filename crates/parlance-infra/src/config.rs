//! Configuration file loader for Parlance.
//!
//! Reads `parlance.toml` and deserializes it into [`AppConfig`]. Falls back
//! to defaults when the file is missing or malformed, so the server always
//! starts with a usable configuration.

use std::path::{Path, PathBuf};

use parlance_types::config::AppConfig;

/// File name looked up in the working directory and the user config dir.
pub const CONFIG_FILE_NAME: &str = "parlance.toml";

/// Decide which configuration file to read.
///
/// Priority:
/// 1. An explicit path (from `--config` or `PARLANCE_CONFIG`)
/// 2. `./parlance.toml` if it exists
/// 3. `{user config dir}/parlance/parlance.toml`
///
/// The returned path may not exist; [`load_config`] treats that as "use
/// defaults".
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }

    dirs::config_dir()
        .map(|dir| dir.join("parlance").join(CONFIG_FILE_NAME))
        .unwrap_or(local)
}

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but cannot be read or parsed, logs a warning and
///   returns the default.
/// - Otherwise returns the parsed config; absent fields take their defaults.
pub async fn load_config(path: &Path) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", path.display());
            config
        }
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// Render a configuration as TOML for display.
///
/// The config holds only the *name* of the API key variable, never the key,
/// so the output is safe to print.
pub fn render_config(config: &AppConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(config)
}

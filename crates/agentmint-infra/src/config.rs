//! Global configuration loader for AgentMint.
//!
//! Reads `config.toml` from the data directory (`~/.agentmint/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use agentmint_types::config::GlobalConfig;
use secrecy::SecretString;

/// Environment variable holding the completion API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Path of the JSON document: the configured override, or `{data_dir}/agents.json`.
pub fn json_store_path(config: &GlobalConfig, data_dir: &Path) -> PathBuf {
    match &config.storage.json_path {
        Some(path) => PathBuf::from(path),
        None => data_dir.join("agents.json"),
    }
}

/// SQLite URL for `{data_dir}/agentmint.db`.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join("agentmint.db").display())
}

/// Read the completion API key from the environment.
///
/// Blank values count as absent.
pub fn completion_api_key() -> Option<SecretString> {
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Some(SecretString::from(key.trim().to_string())),
        _ => None,
    }
}

//! Global configuration types for AgentMint.
//!
//! `GlobalConfig` represents the top-level `config.toml` that selects the
//! storage backend and tunes the completion service and chat window.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the AgentMint service.
///
/// Loaded from `~/.agentmint/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub completion: CompletionConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

/// Which persistence backend holds agents, NFTs, and transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Single JSON document, rewritten on every change.
    #[default]
    Json,
    /// SQLite database; chat history is persisted too.
    Sqlite,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Override for the JSON document path (defaults to `{data_dir}/agents.json`).
    #[serde(default)]
    pub json_path: Option<String>,
}

/// Completion service settings. The API key itself is never part of config;
/// it comes from the `OPENAI_API_KEY` environment variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f64 {
    0.7
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// How many of the most recent messages are passed to the generator.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_history_window() -> usize {
    10
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.storage.backend, StorageBackend::Json);
        assert_eq!(config.completion.model, "gpt-4");
        assert_eq!(config.completion.max_tokens, 1000);
        assert_eq!(config.chat.history_window, 10);
    }

    #[test]
    fn test_global_config_deserialize_empty() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Json);
        assert!(config.storage.json_path.is_none());
        assert_eq!(config.completion.timeout_secs, 30);
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r#"
[storage]
backend = "sqlite"

[completion]
model = "gpt-4o-mini"
temperature = 0.2

[chat]
history_window = 4
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.completion.model, "gpt-4o-mini");
        assert_eq!(config.completion.max_tokens, 1000);
        assert!((config.completion.temperature - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.chat.history_window, 4);
    }
}

//! Service configuration types (classifier, storage).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Classification endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// OpenAI-compatible chat completions URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Used when no key has been stored with `settings set-key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Trailing-edge debounce per newly sighted post.
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Selector for post bodies in the feed.
    #[serde(default = "default_post_selector")]
    pub post_selector: String,

    /// Page opened by `watch` when no URL is given.
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            api_key: None,
            debounce_ms: default_debounce(),
            request_timeout_secs: default_request_timeout(),
            post_selector: default_post_selector(),
            feed_url: default_feed_url(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gemma2-9b-it".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_debounce() -> u64 {
    1000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_post_selector() -> String {
    ".update-components-update-v2__commentary".to_string()
}

fn default_feed_url() -> String {
    "https://www.linkedin.com/feed/".to_string()
}

/// Local persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding settings and job posts. `~` is expanded.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    pub fn resolved_data_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.data_dir).to_string())
    }
}

fn default_data_dir() -> String {
    "~/.feedpilot/data".to_string()
}

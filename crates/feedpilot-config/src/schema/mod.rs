//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

mod schema_automation;
mod schema_services;

pub use schema_automation::*;
pub use schema_services::*;

/// `~/.feedpilot`, or `./.feedpilot` when no home directory is known.
pub fn feedpilot_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".feedpilot")
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub pacing: PacingConfig,

    #[serde(default)]
    pub flows: FlowsConfig,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Inclusive millisecond range for a randomized delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// A range that always yields `ms`.
    pub const fn fixed(ms: u64) -> Self {
        Self::new(ms, ms)
    }

    pub fn is_valid(&self) -> bool {
        self.min_ms <= self.max_ms
    }
}

/// Browser connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Remote debugging port of the Chrome instance.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    /// Launch Chrome headless when no instance is running.
    #[serde(default)]
    pub headless: bool,

    /// Chrome user data directory. A logged-in profile is required for the flows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_dir: Option<String>,

    /// Explicit Chrome executable; searched for when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<String>,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            headless: false,
            profile_dir: None,
            chrome_path: None,
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
        }
    }
}

fn default_debug_port() -> u16 {
    9222
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_viewport_height() -> u32 {
    720
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

//! Browser manager type definitions and configuration.

use std::path::PathBuf;

use feedpilot_config::{BrowserConfig, ConfigLoader, feedpilot_home};
use feedpilot_protocols::MessengerError;
use thiserror::Error;

use crate::cdp::CdpError;

/// Browser manager errors.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Tab not found: {0}")]
    TabNotFound(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("Browser not connected")]
    NotConnected,

    #[error("Chrome not found. Please install Google Chrome or set browser.chrome_path.")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),
}

impl From<CdpError> for BrowserError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ConnectionFailed(msg) => BrowserError::ConnectionFailed(msg),
            CdpError::ChromeNotAvailable(msg) => BrowserError::ConnectionFailed(msg),
            CdpError::SessionClosed => BrowserError::NotConnected,
            CdpError::Protocol { message, .. } if message.contains("No target") => {
                BrowserError::TabNotFound(message)
            }
            _ => BrowserError::ActionFailed(e.to_string()),
        }
    }
}

impl From<BrowserError> for MessengerError {
    fn from(e: BrowserError) -> Self {
        MessengerError::Rejected(e.to_string())
    }
}

/// Browser configuration.
#[derive(Debug, Clone)]
pub struct BrowserManagerConfig {
    pub debug_port: u16,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Profile directory for persistent login state.
    pub profile_dir: Option<PathBuf>,
    pub headless: bool,
    /// Explicit Chrome binary; searched for when unset.
    pub chrome_path: Option<PathBuf>,
}

impl Default for BrowserManagerConfig {
    fn default() -> Self {
        Self::from(&BrowserConfig::default())
    }
}

impl From<&BrowserConfig> for BrowserManagerConfig {
    fn from(config: &BrowserConfig) -> Self {
        Self {
            debug_port: config.debug_port,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            profile_dir: config
                .profile_dir
                .as_deref()
                .map(|p| PathBuf::from(ConfigLoader::expand_path(p))),
            headless: config.headless,
            chrome_path: config
                .chrome_path
                .as_deref()
                .map(|p| PathBuf::from(ConfigLoader::expand_path(p))),
        }
    }
}

impl BrowserManagerConfig {
    /// The profile directory, `~/.feedpilot/browser-profile` unless set.
    pub fn get_profile_dir(&self) -> PathBuf {
        self.profile_dir
            .clone()
            .unwrap_or_else(|| feedpilot_home().join("browser-profile"))
    }

    /// The CDP endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("http://localhost:{}", self.debug_port)
    }
}

//! Tab identity and lifecycle operations.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MessengerError;

/// Browser tab identifier (a CDP target id for live browsers).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub String);

impl TabId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An open tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: TabId,
    pub url: String,
    pub title: String,
}

/// Tab operations performed on behalf of tab contexts.
///
/// Errors are reported as [`MessengerError::Rejected`] so they can be relayed
/// back to the requesting tab unchanged.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// Open a tab. With `active = false` the tab must not take focus.
    async fn create_tab(&self, url: &str, active: bool) -> Result<TabId, MessengerError>;

    /// Bring a tab to the foreground.
    async fn activate_tab(&self, tab: &TabId) -> Result<(), MessengerError>;

    async fn reload_tab(&self, tab: &TabId) -> Result<(), MessengerError>;

    async fn close_tab(&self, tab: &TabId) -> Result<(), MessengerError>;

    /// All page tabs currently open.
    async fn list_tabs(&self) -> Result<Vec<TabInfo>, MessengerError>;
}

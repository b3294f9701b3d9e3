//! BrowserManager core: reaching a debuggable Chrome and holding the
//! connection to it.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{BrowserError, BrowserManagerConfig};
use crate::cdp::CdpClient;
use crate::page::CdpPage;

const STARTUP_POLL: Duration = Duration::from_millis(200);
const STARTUP_POLLS: u32 = 30;

#[cfg(target_os = "macos")]
const CHROME_CANDIDATES: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

#[cfg(target_os = "linux")]
const CHROME_CANDIDATES: &[&str] = &[
    "/usr/bin/google-chrome-stable",
    "/usr/bin/google-chrome",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
];

#[cfg(target_os = "windows")]
const CHROME_CANDIDATES: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
];

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const CHROME_CANDIDATES: &[&str] = &[];

/// The user's logged-in browser session, seen through one CDP connection.
///
/// Chrome is reused when it already listens on the debug port; otherwise it
/// is started with the feedpilot profile and left running afterwards.
pub struct BrowserManager {
    pub(super) config: BrowserManagerConfig,
    pub(super) client: RwLock<Option<Arc<CdpClient>>>,
    /// Attached pages by target id.
    pub(super) pages: RwLock<HashMap<String, Arc<CdpPage>>>,
}

impl BrowserManager {
    pub fn new(config: BrowserManagerConfig) -> Self {
        Self {
            config,
            client: RwLock::new(None),
            pages: RwLock::new(HashMap::new()),
        }
    }

    fn chrome_binary(&self) -> Result<PathBuf, BrowserError> {
        if let Some(path) = &self.config.chrome_path {
            return Ok(path.clone());
        }
        CHROME_CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
            .ok_or(BrowserError::ChromeNotFound)
    }

    async fn devtools_listening(&self) -> bool {
        CdpClient::discover(&self.config.endpoint()).await.is_ok()
    }

    pub(super) fn launch_command(&self) -> Result<Command, BrowserError> {
        let mut cmd = Command::new(self.chrome_binary()?);
        cmd.arg(format!("--remote-debugging-port={}", self.config.debug_port))
            .arg(format!(
                "--user-data-dir={}",
                self.config.get_profile_dir().display()
            ))
            .arg(format!(
                "--window-size={},{}",
                self.config.viewport_width, self.config.viewport_height
            ))
            .args(["--no-first-run", "--no-default-browser-check"])
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        if self.config.headless {
            cmd.arg("--headless=new");
        }
        Ok(cmd)
    }

    /// Start Chrome and wait until its DevTools endpoint answers.
    async fn launch(&self) -> Result<(), BrowserError> {
        let profile_dir = self.config.get_profile_dir();
        if let Err(e) = tokio::fs::create_dir_all(&profile_dir).await {
            warn!("Failed to create profile directory {:?}: {}", profile_dir, e);
        }

        let child = self
            .launch_command()?
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;
        info!(
            "Launched Chrome (pid {:?}) with profile {:?}",
            child.id(),
            profile_dir
        );
        // Dropping the handle leaves the browser running.
        drop(child);

        for _ in 0..STARTUP_POLLS {
            tokio::time::sleep(STARTUP_POLL).await;
            if self.devtools_listening().await {
                return Ok(());
            }
        }
        Err(BrowserError::LaunchFailed(format!(
            "DevTools did not come up on port {}",
            self.config.debug_port
        )))
    }

    /// Connect to Chrome, launching it when nothing listens on the port.
    pub async fn connect(&self) -> Result<(), BrowserError> {
        if self.devtools_listening().await {
            debug!("Reusing Chrome on port {}", self.config.debug_port);
        } else {
            info!("No Chrome on port {}, launching", self.config.debug_port);
            self.launch().await?;
        }

        let client = CdpClient::connect(&self.config.endpoint()).await?;
        *self.client.write().await = Some(Arc::new(client));
        self.pages.write().await.clear();

        info!("Connected to Chrome at {}", self.config.endpoint());
        Ok(())
    }

    /// Connect unless a live connection exists.
    pub async fn ensure_connected(&self) -> Result<(), BrowserError> {
        let live = self
            .client
            .read()
            .await
            .as_ref()
            .is_some_and(|c| c.is_connected());
        if !live {
            self.connect().await?;
        }
        Ok(())
    }

    pub(super) async fn client(&self) -> Result<Arc<CdpClient>, BrowserError> {
        self.ensure_connected().await?;
        self.client
            .read()
            .await
            .clone()
            .ok_or(BrowserError::NotConnected)
    }

    /// Detach every page and drop the connection. Chrome keeps running.
    pub async fn close(&self) -> Result<(), BrowserError> {
        self.pages.write().await.clear();
        if self.client.write().await.take().is_some() {
            info!("Browser connection closed");
        }
        Ok(())
    }
}


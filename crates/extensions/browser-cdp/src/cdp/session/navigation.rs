//! Navigation operations for CDP page session.

use std::time::Duration;

use crate::cdp::error::CdpError;

use super::core::PageSession;

const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(100);

impl PageSession {
    /// Current `document.readyState`.
    pub async fn ready_state(&self) -> Result<String, CdpError> {
        let state = self.evaluate("document.readyState").await?;
        Ok(state.as_str().unwrap_or("").to_string())
    }

    /// Poll until the document is fully loaded. No timeout.
    pub async fn wait_for_load(&self) -> Result<(), CdpError> {
        loop {
            // Evaluation fails while a navigation swaps the execution context.
            match self.ready_state().await {
                Ok(state) if state == "complete" => return Ok(()),
                Ok(_) | Err(CdpError::Protocol { .. }) | Err(CdpError::JavaScript(_)) => {}
                Err(e) => return Err(e),
            }
            tokio::time::sleep(LOAD_POLL_INTERVAL).await;
        }
    }

    /// Reload the page without waiting for it.
    pub async fn reload(&self) -> Result<(), CdpError> {
        self.call("Page.reload", None).await?;
        Ok(())
    }

    pub async fn url(&self) -> Result<String, CdpError> {
        let result = self.evaluate("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }
}

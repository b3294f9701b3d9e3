//! Tab operations: attached pages and the [`TabHost`] implementation.

use std::sync::Arc;

use async_trait::async_trait;
use feedpilot_protocols::{MessengerError, TabHost, TabId, TabInfo};
use tracing::debug;

use super::{BrowserError, BrowserManager};
use crate::page::CdpPage;

impl BrowserManager {
    /// The page for a tab, attaching to it on first use.
    pub async fn page(&self, tab: &TabId) -> Result<Arc<CdpPage>, BrowserError> {
        if let Some(page) = self.pages.read().await.get(tab.as_str()) {
            return Ok(Arc::clone(page));
        }

        let client = self.client().await?;
        let session = client.attach(tab.as_str()).await?;
        let page = Arc::new(CdpPage::attach(session).await?);

        let mut pages = self.pages.write().await;
        let page = pages
            .entry(tab.to_string())
            .or_insert(page)
            .clone();
        debug!("Attached to tab {}", tab);
        Ok(page)
    }

    /// Open `url` in a new foreground tab and attach to it.
    pub async fn open(&self, url: &str) -> Result<(TabId, Arc<CdpPage>), BrowserError> {
        let client = self.client().await?;
        let tab = TabId::new(client.create_target(url, false).await?);
        let page = self.page(&tab).await?;
        Ok((tab, page))
    }

    /// Open page tabs whose URL contains `marker`.
    pub async fn tabs_matching(&self, marker: &str) -> Result<Vec<TabInfo>, BrowserError> {
        let tabs = self.tabs().await?;
        Ok(tabs.into_iter().filter(|t| t.url.contains(marker)).collect())
    }

    pub async fn tabs(&self) -> Result<Vec<TabInfo>, BrowserError> {
        let client = self.client().await?;
        let targets = client.get_targets().await?;
        Ok(targets
            .into_iter()
            .filter(|t| t.target_type == "page")
            .map(|t| TabInfo {
                id: TabId::new(t.target_id),
                url: t.url,
                title: t.title,
            })
            .collect())
    }
}

#[async_trait]
impl TabHost for BrowserManager {
    async fn create_tab(&self, url: &str, active: bool) -> Result<TabId, MessengerError> {
        let client = self.client().await?;
        let target = client
            .create_target(url, !active)
            .await
            .map_err(BrowserError::from)?;
        debug!("Opened {} in tab {} (active: {})", url, target, active);
        Ok(TabId::new(target))
    }

    async fn activate_tab(&self, tab: &TabId) -> Result<(), MessengerError> {
        let client = self.client().await?;
        client
            .activate_target(tab.as_str())
            .await
            .map_err(BrowserError::from)?;
        Ok(())
    }

    async fn reload_tab(&self, tab: &TabId) -> Result<(), MessengerError> {
        let page = self.page(tab).await?;
        page.session()
            .reload()
            .await
            .map_err(BrowserError::from)?;
        debug!("Reloading tab {}", tab);
        Ok(())
    }

    async fn close_tab(&self, tab: &TabId) -> Result<(), MessengerError> {
        self.pages.write().await.remove(tab.as_str());
        let client = self.client().await?;
        client
            .close_target(tab.as_str())
            .await
            .map_err(BrowserError::from)?;
        debug!("Closed tab {}", tab);
        Ok(())
    }

    async fn list_tabs(&self) -> Result<Vec<TabInfo>, MessengerError> {
        Ok(self.tabs().await?)
    }
}

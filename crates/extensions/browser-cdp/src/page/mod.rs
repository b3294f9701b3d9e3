//! [`Page`] over a CDP page session.

mod scripts;

use std::sync::Arc;

use async_trait::async_trait;
use feedpilot_protocols::{
    Decoration, ElementRef, ElementSnapshot, MutationSubscription, Page, PageError, ReadyState,
};
use serde::Deserialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::cdp::{CdpError, CdpEvent, PageSession};

pub use scripts::MUTATION_BINDING;

const MUTATION_CAPACITY: usize = 64;

#[derive(Debug, Deserialize)]
struct Point {
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct ClickTarget {
    point: Option<Point>,
}

/// A browser tab seen through the [`Page`] trait.
///
/// Mutation notifications come from a `MutationObserver` installed in every
/// document of the tab, reported back through a runtime binding. Navigations
/// count as mutations too.
pub struct CdpPage {
    session: Arc<PageSession>,
    mutations: broadcast::Sender<()>,
    pump: JoinHandle<()>,
}

impl CdpPage {
    /// Wrap an attached session and install the mutation observer.
    pub async fn attach(session: PageSession) -> Result<Self, CdpError> {
        let session = Arc::new(session);
        let events = session.events();

        session.add_binding(MUTATION_BINDING).await?;
        let install = scripts::observer_install();
        session.add_init_script(&install).await?;
        session.evaluate(&install).await?;

        let (mutations, _) = broadcast::channel(MUTATION_CAPACITY);
        let pump = tokio::spawn(pump_events(events, mutations.clone()));

        debug!("Attached page {}", session.target_id());
        Ok(Self {
            session,
            mutations,
            pump,
        })
    }

    pub fn session(&self) -> &Arc<PageSession> {
        &self.session
    }

    pub fn target_id(&self) -> &str {
        self.session.target_id()
    }
}

impl Drop for CdpPage {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

/// Forward mutation bindings and navigations as mutation notifications.
pub(crate) async fn pump_events(
    mut events: broadcast::Receiver<CdpEvent>,
    mutations: broadcast::Sender<()>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if event.binding_name() == Some(MUTATION_BINDING) || event.is_navigation() {
                    trace!("Page changed: {}", event.method);
                    let _ = mutations.send(());
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                trace!("Event pump lagged by {}", skipped);
                let _ = mutations.send(());
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn stale(element: &ElementRef) -> PageError {
    PageError::StaleElement(element.to_string())
}

#[async_trait]
impl Page for CdpPage {
    async fn url(&self) -> Result<String, PageError> {
        Ok(self.session.url().await?)
    }

    async fn ready_state(&self) -> Result<ReadyState, PageError> {
        let state = self.session.ready_state().await?;
        ReadyState::parse(&state)
            .ok_or_else(|| PageError::InvalidResponse(format!("readyState '{}'", state)))
    }

    async fn wait_for_load(&self) -> Result<(), PageError> {
        Ok(self.session.wait_for_load().await?)
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementRef>, PageError> {
        let refs: Vec<String> = self
            .session
            .evaluate_as(&scripts::query_all(selector))
            .await?;
        Ok(refs.into_iter().map(ElementRef).collect())
    }

    async fn query_within(
        &self,
        scope: &ElementRef,
        selector: &str,
    ) -> Result<Vec<ElementRef>, PageError> {
        let refs: Option<Vec<String>> = self
            .session
            .evaluate_as(&scripts::query_within(scope, selector))
            .await?;
        let refs = refs.ok_or_else(|| stale(scope))?;
        Ok(refs.into_iter().map(ElementRef).collect())
    }

    async fn inspect(&self, element: &ElementRef) -> Result<ElementSnapshot, PageError> {
        let snapshot: Option<ElementSnapshot> = self
            .session
            .evaluate_as(&scripts::inspect(element))
            .await?;
        snapshot.ok_or_else(|| stale(element))
    }

    async fn click(&self, element: &ElementRef) -> Result<(), PageError> {
        let target: Option<ClickTarget> = self
            .session
            .evaluate_as(&scripts::click_target(element))
            .await?;
        match target {
            None => Err(stale(element)),
            Some(ClickTarget { point: Some(p) }) => Ok(self.session.click(p.x, p.y).await?),
            // Clicked from script: covered or outside the viewport.
            Some(ClickTarget { point: None }) => Ok(()),
        }
    }

    async fn scroll_into_view(&self, element: &ElementRef) -> Result<(), PageError> {
        let found: bool = self
            .session
            .evaluate_as(&scripts::scroll_into_view(element))
            .await?;
        if found { Ok(()) } else { Err(stale(element)) }
    }

    async fn click_body(&self) -> Result<(), PageError> {
        self.session.evaluate(scripts::CLICK_BODY).await?;
        Ok(())
    }

    async fn decorate(
        &self,
        element: &ElementRef,
        decoration: Decoration,
    ) -> Result<(), PageError> {
        let applied: Option<bool> = self
            .session
            .evaluate_as(&scripts::decorate(element, decoration))
            .await?;
        match applied {
            None => Err(stale(element)),
            Some(false) => {
                debug!("No post container around {}, skipping {:?}", element, decoration);
                Ok(())
            }
            Some(true) => Ok(()),
        }
    }

    fn mutations(&self) -> MutationSubscription {
        MutationSubscription::new(self.mutations.subscribe())
    }
}

#[cfg(test)]
#[path = "page_tests.rs"]
mod tests;

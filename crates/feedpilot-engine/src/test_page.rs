//! In-memory page and background used by the engine tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use feedpilot_protocols::{
    Ack, Background, Decoration, ElementRef, ElementSnapshot, MessengerError,
    MutationSubscription, Page, PageError, ReadyState, Rect, Request, Response, TabCreated, TabId,
};
use parking_lot::Mutex;
use tokio::sync::broadcast;

/// Side effect of clicking a fake node.
#[derive(Debug, Clone)]
pub enum ClickEffect {
    Attach(&'static str),
    Detach(&'static str),
    Fail(&'static str),
}

#[derive(Debug, Clone)]
pub struct FakeNode {
    id: &'static str,
    selectors: Vec<String>,
    parent: Option<&'static str>,
    snapshot: ElementSnapshot,
    attached: bool,
    on_click: Vec<ClickEffect>,
}

impl FakeNode {
    pub fn new(id: &'static str, tag: &str) -> Self {
        Self {
            id,
            selectors: Vec::new(),
            parent: None,
            snapshot: ElementSnapshot {
                tag: tag.to_string(),
                rect: Rect::new(10.0, 10.0, 100.0, 30.0),
                display: "block".to_string(),
                visibility: "visible".to_string(),
                opacity: "1".to_string(),
                ..Default::default()
            },
            attached: true,
            on_click: Vec::new(),
        }
    }

    pub fn button(id: &'static str) -> Self {
        Self::new(id, "button").matches(&["button"])
    }

    pub fn matches(mut self, selectors: &[&str]) -> Self {
        self.selectors.extend(selectors.iter().map(|s| s.to_string()));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.snapshot.text = text.to_string();
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.snapshot.aria_label = Some(label.to_string());
        self
    }

    pub fn dom_id(mut self, id: &str) -> Self {
        self.snapshot.id = Some(id.to_string());
        self
    }

    pub fn href(mut self, href: &str) -> Self {
        self.snapshot.href = Some(href.to_string());
        self
    }

    pub fn child_of(mut self, parent: &'static str) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.snapshot.rect = Rect::new(0.0, 0.0, 0.0, 0.0);
        self
    }

    pub fn detached(mut self) -> Self {
        self.attached = false;
        self
    }

    pub fn on_click(mut self, effect: ClickEffect) -> Self {
        self.on_click.push(effect);
        self
    }
}

#[derive(Default)]
struct Dom {
    url: String,
    ready: Option<ReadyState>,
    nodes: Vec<FakeNode>,
    clicks: Vec<String>,
    scrolls: Vec<String>,
    body_clicks: usize,
    body_click_effects: Vec<ClickEffect>,
    inspect_count: usize,
}

pub struct FakePage {
    dom: Mutex<Dom>,
    mutations: broadcast::Sender<()>,
}

impl FakePage {
    pub fn new(url: &str) -> Arc<Self> {
        let (mutations, _) = broadcast::channel(64);
        Arc::new(Self {
            dom: Mutex::new(Dom {
                url: url.to_string(),
                ready: Some(ReadyState::Complete),
                ..Default::default()
            }),
            mutations,
        })
    }

    pub fn add(&self, node: FakeNode) {
        self.dom.lock().nodes.push(node);
    }

    pub fn on_body_click(&self, effect: ClickEffect) {
        self.dom.lock().body_click_effects.push(effect);
    }

    pub fn set_ready(&self, ready: ReadyState) {
        self.dom.lock().ready = Some(ready);
    }

    /// Attach a node and notify observers.
    pub fn attach(&self, id: &str) {
        self.set_attached(id, true);
        let _ = self.mutations.send(());
    }

    /// Fire a mutation that changes nothing the locators look at.
    pub fn touch(&self) {
        let _ = self.mutations.send(());
    }

    pub fn observer_count(&self) -> usize {
        self.mutations.receiver_count()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.dom.lock().clicks.clone()
    }

    pub fn scrolls(&self) -> Vec<String> {
        self.dom.lock().scrolls.clone()
    }

    pub fn body_clicks(&self) -> usize {
        self.dom.lock().body_clicks
    }

    pub fn inspect_count(&self) -> usize {
        self.dom.lock().inspect_count
    }

    fn set_attached(&self, id: &str, attached: bool) {
        let mut dom = self.dom.lock();
        if let Some(node) = dom.nodes.iter_mut().find(|n| n.id == id) {
            node.attached = attached;
        }
    }

    fn apply(&self, effects: Vec<ClickEffect>) -> Result<(), PageError> {
        let mut changed = false;
        for effect in effects {
            match effect {
                ClickEffect::Attach(id) => {
                    self.set_attached(id, true);
                    changed = true;
                }
                ClickEffect::Detach(id) => {
                    self.set_attached(id, false);
                    changed = true;
                }
                ClickEffect::Fail(message) => return Err(PageError::Script(message.to_string())),
            }
        }
        if changed {
            let _ = self.mutations.send(());
        }
        Ok(())
    }
}

#[async_trait]
impl Page for FakePage {
    async fn url(&self) -> Result<String, PageError> {
        Ok(self.dom.lock().url.clone())
    }

    async fn ready_state(&self) -> Result<ReadyState, PageError> {
        Ok(self.dom.lock().ready.unwrap_or(ReadyState::Loading))
    }

    async fn wait_for_load(&self) -> Result<(), PageError> {
        loop {
            if self.ready_state().await? == ReadyState::Complete {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementRef>, PageError> {
        let dom = self.dom.lock();
        Ok(dom
            .nodes
            .iter()
            .filter(|n| n.attached && n.selectors.iter().any(|s| s == selector))
            .map(|n| ElementRef::new(n.id))
            .collect())
    }

    async fn query_within(
        &self,
        scope: &ElementRef,
        selector: &str,
    ) -> Result<Vec<ElementRef>, PageError> {
        let dom = self.dom.lock();
        Ok(dom
            .nodes
            .iter()
            .filter(|n| n.attached && n.parent == Some(scope.as_str()))
            .filter(|n| n.selectors.iter().any(|s| s == selector))
            .map(|n| ElementRef::new(n.id))
            .collect())
    }

    async fn inspect(&self, element: &ElementRef) -> Result<ElementSnapshot, PageError> {
        let mut dom = self.dom.lock();
        dom.inspect_count += 1;
        dom.nodes
            .iter()
            .find(|n| n.attached && n.id == element.as_str())
            .map(|n| n.snapshot.clone())
            .ok_or_else(|| PageError::StaleElement(element.to_string()))
    }

    async fn click(&self, element: &ElementRef) -> Result<(), PageError> {
        let effects = {
            let mut dom = self.dom.lock();
            let node = dom
                .nodes
                .iter()
                .find(|n| n.attached && n.id == element.as_str())
                .ok_or_else(|| PageError::StaleElement(element.to_string()))?;
            let effects = node.on_click.clone();
            dom.clicks.push(element.to_string());
            effects
        };
        self.apply(effects)
    }

    async fn scroll_into_view(&self, element: &ElementRef) -> Result<(), PageError> {
        self.dom.lock().scrolls.push(element.to_string());
        Ok(())
    }

    async fn click_body(&self) -> Result<(), PageError> {
        let effects = {
            let mut dom = self.dom.lock();
            dom.body_clicks += 1;
            dom.body_click_effects.clone()
        };
        self.apply(effects)
    }

    async fn decorate(
        &self,
        _element: &ElementRef,
        _decoration: Decoration,
    ) -> Result<(), PageError> {
        Ok(())
    }

    fn mutations(&self) -> MutationSubscription {
        MutationSubscription::new(self.mutations.subscribe())
    }
}

/// Background that records every request and acknowledges it.
#[derive(Default)]
pub struct RecordingBackground {
    requests: Mutex<Vec<Request>>,
    reject_reload: bool,
    reject_create: bool,
}

impl RecordingBackground {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn rejecting_reload() -> Arc<Self> {
        Arc::new(Self {
            reject_reload: true,
            ..Default::default()
        })
    }

    pub fn rejecting_create() -> Arc<Self> {
        Arc::new(Self {
            reject_create: true,
            ..Default::default()
        })
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    pub fn count(&self, action: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.action() == action)
            .count()
    }
}

#[async_trait]
impl Background for RecordingBackground {
    async fn send(&self, request: Request) -> Result<Response, MessengerError> {
        self.requests.lock().push(request.clone());
        Ok(match request {
            Request::CreateBackgroundTab { .. } if self.reject_create => {
                Response::TabCreated(TabCreated {
                    success: false,
                    tab_id: None,
                    error: Some("tab limit".to_string()),
                })
            }
            Request::CreateBackgroundTab { .. } => Response::TabCreated(TabCreated {
                success: true,
                tab_id: Some(TabId::new("bg-1")),
                error: None,
            }),
            Request::ReloadTab if self.reject_reload => Response::Ack(Ack::failed("No tab ID")),
            Request::ReloadTab | Request::CloseTab => Response::Ack(Ack::ok()),
            other => Response::Ack(Ack::unsupported(other.action())),
        })
    }
}

//! In-memory feed page for classifier tests.

use std::sync::Arc;

use async_trait::async_trait;
use feedpilot_protocols::{
    Decoration, ElementRef, ElementSnapshot, MutationSubscription, Page, PageError, ReadyState,
};
use parking_lot::Mutex;
use tokio::sync::broadcast;

pub struct FeedPage {
    posts: Mutex<Vec<(ElementRef, String)>>,
    decorations: Mutex<Vec<(ElementRef, Decoration)>>,
    mutations: Mutex<Option<broadcast::Sender<()>>>,
}

impl FeedPage {
    pub fn new() -> Arc<Self> {
        let (tx, _) = broadcast::channel(16);
        Arc::new(Self {
            posts: Mutex::new(Vec::new()),
            decorations: Mutex::new(Vec::new()),
            mutations: Mutex::new(Some(tx)),
        })
    }

    /// Add a post without notifying observers.
    pub fn add(&self, id: &str, text: &str) -> ElementRef {
        let element = ElementRef::new(id);
        self.posts.lock().push((element.clone(), text.to_string()));
        element
    }

    /// Notify observers of a DOM change.
    pub fn touch(&self) {
        if let Some(tx) = self.mutations.lock().as_ref() {
            let _ = tx.send(());
        }
    }

    /// End the mutation stream.
    pub fn close(&self) {
        self.mutations.lock().take();
    }

    pub fn observer_count(&self) -> usize {
        self.mutations
            .lock()
            .as_ref()
            .map_or(0, |tx| tx.receiver_count())
    }

    pub fn decorations(&self) -> Vec<(ElementRef, Decoration)> {
        self.decorations.lock().clone()
    }

    fn text_of(&self, element: &ElementRef) -> Option<String> {
        self.posts
            .lock()
            .iter()
            .find(|(e, _)| e == element)
            .map(|(_, text)| text.clone())
    }
}

#[async_trait]
impl Page for FeedPage {
    async fn url(&self) -> Result<String, PageError> {
        Ok("https://www.linkedin.com/feed/".to_string())
    }

    async fn ready_state(&self) -> Result<ReadyState, PageError> {
        Ok(ReadyState::Complete)
    }

    async fn wait_for_load(&self) -> Result<(), PageError> {
        Ok(())
    }

    async fn query_all(&self, _selector: &str) -> Result<Vec<ElementRef>, PageError> {
        Ok(self.posts.lock().iter().map(|(e, _)| e.clone()).collect())
    }

    async fn query_within(
        &self,
        _scope: &ElementRef,
        _selector: &str,
    ) -> Result<Vec<ElementRef>, PageError> {
        Ok(Vec::new())
    }

    async fn inspect(&self, element: &ElementRef) -> Result<ElementSnapshot, PageError> {
        let text = self
            .text_of(element)
            .ok_or_else(|| PageError::StaleElement(element.to_string()))?;
        Ok(ElementSnapshot {
            tag: "div".to_string(),
            text,
            ..Default::default()
        })
    }

    async fn click(&self, _element: &ElementRef) -> Result<(), PageError> {
        Ok(())
    }

    async fn scroll_into_view(&self, _element: &ElementRef) -> Result<(), PageError> {
        Ok(())
    }

    async fn click_body(&self) -> Result<(), PageError> {
        Ok(())
    }

    async fn decorate(
        &self,
        element: &ElementRef,
        decoration: Decoration,
    ) -> Result<(), PageError> {
        self.decorations.lock().push((element.clone(), decoration));
        Ok(())
    }

    fn mutations(&self) -> MutationSubscription {
        let rx = match self.mutations.lock().as_ref() {
            Some(tx) => tx.subscribe(),
            None => broadcast::channel(1).1,
        };
        MutationSubscription::new(rx)
    }
}

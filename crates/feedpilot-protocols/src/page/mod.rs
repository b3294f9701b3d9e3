//! DOM access for a single browser tab.
//!
//! Flows never touch the DOM directly: everything goes through [`Page`], so
//! the same flow code runs against a live CDP session or an in-memory page.

mod snapshot;
mod subscription;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PageError;

pub use snapshot::{ElementSnapshot, Rect};
pub use subscription::MutationSubscription;

/// Opaque handle to an element of the current document.
///
/// Handles are stable for the lifetime of the document: querying the same
/// node twice yields equal refs. A reload invalidates every handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef(pub String);

impl ElementRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "loading" => Some(Self::Loading),
            "interactive" => Some(Self::Interactive),
            "complete" => Some(Self::Complete),
            _ => None,
        }
    }
}

/// Visual treatment applied to a classified post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decoration {
    /// Blur the post behind an overlay with a "Click to View" control.
    Mask,
    /// Teal highlight with an "AI Job" badge.
    Highlight,
}

/// DOM operations available to flows.
#[async_trait]
pub trait Page: Send + Sync {
    /// Current document URL.
    async fn url(&self) -> Result<String, PageError>;

    /// Current `document.readyState`.
    async fn ready_state(&self) -> Result<ReadyState, PageError>;

    /// Suspend until the document reports `complete`. No timeout.
    async fn wait_for_load(&self) -> Result<(), PageError>;

    /// All elements matching a CSS selector, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementRef>, PageError>;

    /// Descendants of `scope` matching a CSS selector, in document order.
    async fn query_within(
        &self,
        scope: &ElementRef,
        selector: &str,
    ) -> Result<Vec<ElementRef>, PageError>;

    /// Geometry, style and text of an element.
    async fn inspect(&self, element: &ElementRef) -> Result<ElementSnapshot, PageError>;

    /// Dispatch a click on the element.
    async fn click(&self, element: &ElementRef) -> Result<(), PageError>;

    /// Scroll the element to the vertical center of the viewport.
    async fn scroll_into_view(&self, element: &ElementRef) -> Result<(), PageError>;

    /// Click the document body, dismissing open menus.
    async fn click_body(&self) -> Result<(), PageError>;

    /// Apply a visual decoration to the post containing `element`.
    async fn decorate(&self, element: &ElementRef, decoration: Decoration)
    -> Result<(), PageError>;

    /// Subscribe to document mutation notifications.
    fn mutations(&self) -> MutationSubscription;
}

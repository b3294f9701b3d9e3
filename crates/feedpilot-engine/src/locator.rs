//! Element locators: ordered strategies with early exit.

use feedpilot_protocols::{ElementRef, ElementSnapshot, Page, PageError};
use tracing::trace;

use crate::visibility::is_visible;

/// Test applied to a candidate element's snapshot.
///
/// Text and label needles are matched case-insensitively against the
/// normalized (trimmed, collapsed, lower-cased) values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Any element the selector matched.
    Any,
    TextEquals(String),
    TextContains(String),
    /// `needle` appears as a whole word of the text.
    TextWord(String),
    LabelEquals(String),
    LabelContains(String),
    /// The element's `id` attribute contains `needle` (case-sensitive).
    IdContains(String),
    AnyOf(Vec<Predicate>),
    AllOf(Vec<Predicate>),
}

impl Predicate {
    pub fn text_equals(needle: &str) -> Self {
        Self::TextEquals(needle.to_lowercase())
    }

    pub fn text_contains(needle: &str) -> Self {
        Self::TextContains(needle.to_lowercase())
    }

    pub fn text_word(needle: &str) -> Self {
        Self::TextWord(needle.to_lowercase())
    }

    pub fn label_equals(needle: &str) -> Self {
        Self::LabelEquals(needle.to_lowercase())
    }

    pub fn label_contains(needle: &str) -> Self {
        Self::LabelContains(needle.to_lowercase())
    }

    pub fn id_contains(needle: &str) -> Self {
        Self::IdContains(needle.to_string())
    }

    pub fn matches(&self, snapshot: &ElementSnapshot) -> bool {
        match self {
            Predicate::Any => true,
            Predicate::TextEquals(n) => snapshot.normalized_text() == *n,
            Predicate::TextContains(n) => snapshot.normalized_text().contains(n.as_str()),
            Predicate::TextWord(n) => contains_word(&snapshot.normalized_text(), n),
            Predicate::LabelEquals(n) => snapshot.normalized_label() == *n,
            Predicate::LabelContains(n) => snapshot.normalized_label().contains(n.as_str()),
            Predicate::IdContains(n) => snapshot.id_contains(n),
            Predicate::AnyOf(ps) => ps.iter().any(|p| p.matches(snapshot)),
            Predicate::AllOf(ps) => ps.iter().all(|p| p.matches(snapshot)),
        }
    }
}

fn contains_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}

/// One way of finding an element: a CSS selector plus a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    pub selector: String,
    pub predicate: Predicate,
}

/// A match produced by a [`Locator`].
#[derive(Debug, Clone)]
pub struct Found {
    pub element: ElementRef,
    pub snapshot: ElementSnapshot,
    /// Index of the strategy that matched.
    pub strategy: usize,
}

/// Ordered fallback strategies for one UI element.
///
/// Strategies are tried in order; the first one yielding a visible match
/// wins and later strategies are not evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    description: String,
    strategies: Vec<Strategy>,
}

impl Locator {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            strategies: Vec::new(),
        }
    }

    /// Add a strategy matching any element selected by `selector`.
    pub fn css(self, selector: impl Into<String>) -> Self {
        self.with(selector, Predicate::Any)
    }

    /// Add a strategy filtering `selector` matches through `predicate`.
    pub fn with(mut self, selector: impl Into<String>, predicate: Predicate) -> Self {
        self.strategies.push(Strategy {
            selector: selector.into(),
            predicate,
        });
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// First visible match in the document.
    pub async fn find(&self, page: &dyn Page) -> Result<Option<Found>, PageError> {
        self.search(page, None, true).await
    }

    /// First visible match among the descendants of `scope`.
    pub async fn find_within(
        &self,
        page: &dyn Page,
        scope: &ElementRef,
    ) -> Result<Option<Found>, PageError> {
        self.search(page, Some(scope), true).await
    }

    /// First match in the document, visible or not.
    pub async fn find_present(&self, page: &dyn Page) -> Result<Option<Found>, PageError> {
        self.search(page, None, false).await
    }

    async fn search(
        &self,
        page: &dyn Page,
        scope: Option<&ElementRef>,
        require_visible: bool,
    ) -> Result<Option<Found>, PageError> {
        for (index, strategy) in self.strategies.iter().enumerate() {
            let candidates = match scope {
                Some(scope) => page.query_within(scope, &strategy.selector).await?,
                None => page.query_all(&strategy.selector).await?,
            };

            for element in candidates {
                let snapshot = match page.inspect(&element).await {
                    Ok(snapshot) => snapshot,
                    // Removed between query and inspect.
                    Err(PageError::StaleElement(_)) => continue,
                    Err(e) => return Err(e),
                };
                if !strategy.predicate.matches(&snapshot) {
                    continue;
                }
                if require_visible && !is_visible(&snapshot) {
                    continue;
                }
                trace!(
                    "{} matched strategy {} ({})",
                    self.description, index, strategy.selector
                );
                return Ok(Some(Found {
                    element,
                    snapshot,
                    strategy: index,
                }));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;

//! Element snapshots returned by [`Page::inspect`](super::Page::inspect).

use serde::{Deserialize, Serialize};

/// Bounding client rect, in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }
}

/// Point-in-time view of an element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSnapshot {
    pub tag: String,
    /// Trimmed text content.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    pub rect: Rect,
    /// Computed `display`.
    #[serde(default)]
    pub display: String,
    /// Computed `visibility`.
    #[serde(default)]
    pub visibility: String,
    /// Computed `opacity`, as the string the style engine reports.
    #[serde(default)]
    pub opacity: String,
}

impl ElementSnapshot {
    /// Lower-cased text with runs of whitespace collapsed to one space.
    pub fn normalized_text(&self) -> String {
        normalize(&self.text)
    }

    /// Lower-cased aria-label, empty when absent.
    pub fn normalized_label(&self) -> String {
        self.aria_label.as_deref().map(normalize).unwrap_or_default()
    }

    pub fn id_contains(&self, needle: &str) -> bool {
        self.id.as_deref().is_some_and(|id| id.contains(needle))
    }
}

fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

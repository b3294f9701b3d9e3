//! Terminal results of flows and batches.

use serde::{Deserialize, Serialize};

use crate::tab::TabId;

/// Result of one unfollow flow invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowOutcome {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_close: Option<bool>,
}

impl FlowOutcome {
    pub fn success(message: impl Into<String>, should_close: bool) -> Self {
        Self {
            success: true,
            message: message.into(),
            should_close: Some(should_close),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            should_close: None,
        }
    }
}

/// One failed invitation card. `index` is 1-based, in page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardError {
    pub index: usize,
    pub message: String,
}

/// Result of an accept-invitation batch on one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptReport {
    pub success: bool,
    pub processed: usize,
    #[serde(default)]
    pub errors: Vec<CardError>,
    /// Number of eligible cards found on the page.
    pub total: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AcceptReport {
    /// A precondition failure: nothing was attempted.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

/// Outcome of one tab within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabOutcome {
    pub tab_id: TabId,
    pub outcome: FlowOutcome,
}

/// Per-tab outcomes of a fan-out, in target order, with their summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<TabOutcome>,
    pub successful: usize,
    pub total: usize,
}

impl BatchReport {
    pub fn from_outcomes(outcomes: Vec<TabOutcome>) -> Self {
        let successful = outcomes.iter().filter(|o| o.outcome.success).count();
        let total = outcomes.len();
        Self {
            outcomes,
            successful,
            total,
        }
    }

    /// `(successful, total)`.
    pub fn summary(&self) -> (usize, usize) {
        (self.successful, self.total)
    }
}

//! Automation configuration types (pacing, flows, batch).

use serde::{Deserialize, Serialize};

use super::DelayRange;

/// Randomized delays around simulated UI actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Before the unfollow flow starts looking for its trigger.
    #[serde(default = "default_initial")]
    pub initial: DelayRange,

    /// Before every click.
    #[serde(default = "default_before_click")]
    pub before_click: DelayRange,

    /// After a click that changes the page (trigger, unfollow item, confirm).
    #[serde(default = "default_after_click")]
    pub after_click: DelayRange,

    /// After clicking "More", while the dropdown renders.
    #[serde(default = "default_after_menu")]
    pub after_menu: DelayRange,

    /// After clicking an accept control.
    #[serde(default = "default_after_accept")]
    pub after_accept: DelayRange,

    /// Between two invitation cards.
    #[serde(default = "default_between_cards")]
    pub between_cards: DelayRange,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            initial: default_initial(),
            before_click: default_before_click(),
            after_click: default_after_click(),
            after_menu: default_after_menu(),
            after_accept: default_after_accept(),
            between_cards: default_between_cards(),
        }
    }
}

impl PacingConfig {
    /// Every range with its config path, for validation.
    pub fn ranges(&self) -> [(&'static str, DelayRange); 6] {
        [
            ("pacing.initial", self.initial),
            ("pacing.before_click", self.before_click),
            ("pacing.after_click", self.after_click),
            ("pacing.after_menu", self.after_menu),
            ("pacing.after_accept", self.after_accept),
            ("pacing.between_cards", self.between_cards),
        ]
    }
}

fn default_initial() -> DelayRange {
    DelayRange::new(500, 2000)
}

fn default_before_click() -> DelayRange {
    DelayRange::new(300, 800)
}

fn default_after_click() -> DelayRange {
    DelayRange::new(1000, 2000)
}

fn default_after_menu() -> DelayRange {
    DelayRange::new(1500, 2500)
}

fn default_after_accept() -> DelayRange {
    DelayRange::new(500, 1000)
}

fn default_between_cards() -> DelayRange {
    DelayRange::new(1000, 2000)
}

/// Flow timeouts and page recognition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowsConfig {
    /// Default element waiter timeout.
    #[serde(default = "default_waiter_timeout")]
    pub waiter_timeout_ms: u64,

    /// How long the unfollow flow waits for a trigger control to render.
    #[serde(default = "default_trigger_wait")]
    pub trigger_wait_ms: u64,

    /// How long the unfollow flow waits for the confirmation modal.
    #[serde(default = "default_confirm_wait")]
    pub confirm_wait_ms: u64,

    /// Fixed settle time before enumerating invitation cards.
    #[serde(default = "default_accept_settle")]
    pub accept_settle_ms: u64,

    #[serde(default = "default_accept_count")]
    pub default_accept_count: usize,

    /// URL fragment identifying a profile page.
    #[serde(default = "default_profile_marker")]
    pub profile_url_marker: String,

    /// URL fragment identifying the invitation manager page.
    #[serde(default = "default_invitation_marker")]
    pub invitation_url_marker: String,

    /// Page opened by `accept` when no invitation tab is open.
    #[serde(default = "default_invitation_url")]
    pub invitation_url: String,
}

impl Default for FlowsConfig {
    fn default() -> Self {
        Self {
            waiter_timeout_ms: default_waiter_timeout(),
            trigger_wait_ms: default_trigger_wait(),
            confirm_wait_ms: default_confirm_wait(),
            accept_settle_ms: default_accept_settle(),
            default_accept_count: default_accept_count(),
            profile_url_marker: default_profile_marker(),
            invitation_url_marker: default_invitation_marker(),
            invitation_url: default_invitation_url(),
        }
    }
}

fn default_waiter_timeout() -> u64 {
    5000
}

fn default_trigger_wait() -> u64 {
    2000
}

fn default_confirm_wait() -> u64 {
    1500
}

fn default_accept_settle() -> u64 {
    1000
}

fn default_accept_count() -> usize {
    10
}

fn default_profile_marker() -> String {
    "linkedin.com/in/".to_string()
}

fn default_invitation_marker() -> String {
    "linkedin.com/mynetwork/invitation-manager".to_string()
}

fn default_invitation_url() -> String {
    "https://www.linkedin.com/mynetwork/invitation-manager/".to_string()
}

/// Fan-out across tabs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Random start offset per tab.
    #[serde(default = "default_start_offset")]
    pub start_offset: DelayRange,

    /// Wait after a reload before re-invoking a tab's flow.
    #[serde(default = "default_retry_settle")]
    pub retry_settle_ms: u64,

    /// Wait after opening a tab before its flow is started.
    #[serde(default = "default_open_settle")]
    pub open_settle_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            start_offset: default_start_offset(),
            retry_settle_ms: default_retry_settle(),
            open_settle_ms: default_open_settle(),
        }
    }
}

fn default_start_offset() -> DelayRange {
    DelayRange::new(1000, 5000)
}

fn default_retry_settle() -> u64 {
    3000
}

fn default_open_settle() -> u64 {
    3000
}

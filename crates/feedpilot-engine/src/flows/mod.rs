//! Concrete flows.

mod accept;
pub mod selectors;
mod unfollow;

use std::time::Duration;

use feedpilot_config::FlowsConfig;

pub use accept::AcceptFlow;
pub use unfollow::{TriggerKind, UnfollowFlow, UnfollowState};

pub const MSG_ALREADY_PROCESSING: &str = "Already processing";
pub const MSG_NOT_PROFILE: &str = "Not a profile page";
pub const MSG_RELOADING: &str = "Reloading and retrying";
pub const MSG_NO_TRIGGER: &str = "No trigger found after reload";
pub const MSG_NO_CONFIRM: &str = "No confirmation button found";
pub const MSG_NOT_FOLLOWING: &str = "Not following this profile";
pub const MSG_OPTION_MISSING: &str = "Following but unfollow option not found";
pub const MSG_UNFOLLOWED: &str = "Unfollow completed successfully";
pub const MSG_WRONG_PAGE: &str = "Not on invitation manager page";
pub const MSG_NO_INVITATIONS: &str = "No pending invitations found";

/// Page recognition and wait budgets shared by the flows.
#[derive(Debug, Clone)]
pub struct FlowSettings {
    pub profile_url_marker: String,
    pub invitation_url_marker: String,
    pub trigger_wait: Duration,
    pub confirm_wait: Duration,
    pub accept_settle: Duration,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self::from(&FlowsConfig::default())
    }
}

impl From<&FlowsConfig> for FlowSettings {
    fn from(config: &FlowsConfig) -> Self {
        Self {
            profile_url_marker: config.profile_url_marker.clone(),
            invitation_url_marker: config.invitation_url_marker.clone(),
            trigger_wait: Duration::from_millis(config.trigger_wait_ms),
            confirm_wait: Duration::from_millis(config.confirm_wait_ms),
            accept_settle: Duration::from_millis(config.accept_settle_ms),
        }
    }
}

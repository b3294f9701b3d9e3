//! Unfollow flow for a single profile page.
//!
//! ```text
//! Idle -> LocatingTrigger -> TriggerClicked(kind) -> LocatingConfirm -> Confirmed
//!                 \                  \                      \
//!                  +------------------+----------------------+--> Aborted
//! ```
//!
//! A page that is missing its controls gets one reload per session: the
//! flow asks the background to reload the tab and reports
//! "Reloading and retrying"; the caller re-invokes once the page is back.

use std::sync::Arc;

use feedpilot_protocols::{Background, FlowError, FlowOutcome, Page};
use tracing::{Instrument, debug, info, info_span, warn};

use super::selectors;
use super::{
    FlowSettings, MSG_ALREADY_PROCESSING, MSG_NO_CONFIRM, MSG_NO_TRIGGER, MSG_NOT_FOLLOWING,
    MSG_NOT_PROFILE, MSG_OPTION_MISSING, MSG_RELOADING, MSG_UNFOLLOWED,
};
use crate::locator::Found;
use crate::pacer::Pacer;
use crate::session::FlowSession;
use crate::waiter::ElementWaiter;

/// Which control started the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// Direct "Following" button; the confirmation modal follows.
    Following,
    /// Overflow "More" button; the dropdown carries the unfollow option.
    More,
}

#[derive(Debug)]
pub enum UnfollowState {
    Idle,
    LocatingTrigger,
    TriggerClicked(TriggerKind),
    LocatingConfirm,
    Confirmed(FlowOutcome),
    Aborted(FlowOutcome),
}

impl UnfollowState {
    fn name(&self) -> &'static str {
        match self {
            UnfollowState::Idle => "idle",
            UnfollowState::LocatingTrigger => "locating-trigger",
            UnfollowState::TriggerClicked(_) => "trigger-clicked",
            UnfollowState::LocatingConfirm => "locating-confirm",
            UnfollowState::Confirmed(_) => "confirmed",
            UnfollowState::Aborted(_) => "aborted",
        }
    }
}

pub struct UnfollowFlow {
    page: Arc<dyn Page>,
    session: Arc<FlowSession>,
    background: Arc<dyn Background>,
    pacer: Pacer,
    waiter: ElementWaiter,
    settings: FlowSettings,
}

impl UnfollowFlow {
    pub fn new(
        page: Arc<dyn Page>,
        session: Arc<FlowSession>,
        background: Arc<dyn Background>,
        pacer: Pacer,
        waiter: ElementWaiter,
        settings: FlowSettings,
    ) -> Self {
        Self {
            page,
            session,
            background,
            pacer,
            waiter,
            settings,
        }
    }

    /// Run the flow to a terminal outcome. Never fails: every error path
    /// resolves to an outcome.
    pub async fn run(&self) -> FlowOutcome {
        let Some(_guard) = self.session.try_begin() else {
            debug!("Unfollow requested while another flow is running");
            return FlowOutcome::failure(MSG_ALREADY_PROCESSING);
        };

        match self.is_profile_page().await {
            Ok(true) => {}
            Ok(false) => return FlowOutcome::failure(MSG_NOT_PROFILE),
            Err(e) => return FlowOutcome::failure(e.to_string()),
        }

        let outcome = match self.drive().instrument(info_span!("unfollow")).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Unfollow flow error: {}", e);
                self.reload_or_fail(e.to_string()).await
            }
        };
        info!(
            success = outcome.success,
            "Unfollow finished: {}", outcome.message
        );
        outcome
    }

    async fn is_profile_page(&self) -> Result<bool, FlowError> {
        let url = self.page.url().await?;
        Ok(url.contains(&self.settings.profile_url_marker))
    }

    async fn drive(&self) -> Result<FlowOutcome, FlowError> {
        let mut state = UnfollowState::Idle;
        loop {
            debug!("Unfollow state: {}", state.name());
            state = match state {
                UnfollowState::Confirmed(outcome) | UnfollowState::Aborted(outcome) => {
                    return Ok(outcome);
                }
                UnfollowState::Idle => self.start().await?,
                UnfollowState::LocatingTrigger => self.locate_trigger().await?,
                UnfollowState::TriggerClicked(kind) => self.after_trigger(kind).await?,
                UnfollowState::LocatingConfirm => self.locate_confirm().await?,
            };
        }
    }

    async fn start(&self) -> Result<UnfollowState, FlowError> {
        self.page.wait_for_load().await?;
        self.pacer.initial().await;
        Ok(UnfollowState::LocatingTrigger)
    }

    async fn locate_trigger(&self) -> Result<UnfollowState, FlowError> {
        let locators = [selectors::following_trigger(), selectors::more_trigger()];
        let found = self
            .waiter
            .wait_for_any(
                self.page.as_ref(),
                &locators,
                Some(self.settings.trigger_wait),
            )
            .await?;

        match found {
            None => {
                debug!("No Following or More control on the page");
                let outcome = self.reload_or_fail(MSG_NO_TRIGGER.to_string()).await;
                Ok(UnfollowState::Aborted(outcome))
            }
            Some((0, trigger)) => {
                self.click_paced(&trigger).await?;
                Ok(UnfollowState::TriggerClicked(TriggerKind::Following))
            }
            Some((_, trigger)) => {
                self.open_menu(&trigger).await?;
                Ok(UnfollowState::TriggerClicked(TriggerKind::More))
            }
        }
    }

    async fn after_trigger(&self, kind: TriggerKind) -> Result<UnfollowState, FlowError> {
        match kind {
            TriggerKind::Following => Ok(UnfollowState::LocatingConfirm),
            TriggerKind::More => self.choose_unfollow().await,
        }
    }

    async fn locate_confirm(&self) -> Result<UnfollowState, FlowError> {
        let confirm = self
            .waiter
            .wait(
                self.page.as_ref(),
                &selectors::confirm_unfollow(),
                Some(self.settings.confirm_wait),
            )
            .await?;

        let Some(confirm) = confirm else {
            return Ok(UnfollowState::Aborted(FlowOutcome::failure(MSG_NO_CONFIRM)));
        };

        self.pacer.before_click().await;
        self.page.click(&confirm.element).await?;
        self.pacer.after_click().await;

        if let Err(e) = self.background.close_tab().await {
            warn!("Close request after unfollow failed: {}", e);
        }
        Ok(UnfollowState::Confirmed(FlowOutcome::success(
            MSG_UNFOLLOWED,
            true,
        )))
    }

    /// Scroll, pace, click, then give the page time to react.
    async fn click_paced(&self, target: &Found) -> Result<(), FlowError> {
        self.page.scroll_into_view(&target.element).await?;
        self.pacer.before_click().await;
        self.page.click(&target.element).await?;
        self.pacer.after_click().await;
        Ok(())
    }

    /// Click "More" and make sure its dropdown opened, retrying the click once.
    async fn open_menu(&self, more: &Found) -> Result<(), FlowError> {
        let page = self.page.as_ref();
        page.scroll_into_view(&more.element).await?;
        self.pacer.before_click().await;

        if !page.query_all(selectors::OPEN_DROPDOWN).await?.is_empty() {
            debug!("Closing a dropdown that was already open");
            page.click_body().await?;
            self.pacer.before_click().await;
        }

        page.click(&more.element).await?;
        self.pacer.after_menu().await;

        if selectors::open_dropdown().find_present(page).await?.is_none() {
            debug!("Dropdown did not open, clicking More again");
            self.pacer.before_click().await;
            page.click(&more.element).await?;
            self.pacer.after_menu().await;
        }
        Ok(())
    }

    async fn choose_unfollow(&self) -> Result<UnfollowState, FlowError> {
        let page = self.page.as_ref();
        if let Some(option) = selectors::unfollow_option().find(page).await? {
            self.click_paced(&option).await?;
            return Ok(UnfollowState::LocatingConfirm);
        }

        if selectors::following_indicator()
            .find_present(page)
            .await?
            .is_none()
        {
            return Ok(UnfollowState::Aborted(FlowOutcome::success(
                MSG_NOT_FOLLOWING,
                false,
            )));
        }

        debug!("Profile is followed but the dropdown has no unfollow option");
        let outcome = self.reload_or_fail(MSG_OPTION_MISSING.to_string()).await;
        Ok(UnfollowState::Aborted(outcome))
    }

    /// Spend the session's single reload, or give up with `terminal`.
    async fn reload_or_fail(&self, terminal: String) -> FlowOutcome {
        if !self.session.mark_reloaded() {
            return FlowOutcome::failure(terminal);
        }
        info!("Requesting page reload before giving up");
        match self.background.reload_tab().await {
            Ok(()) => FlowOutcome::failure(MSG_RELOADING),
            Err(e) => FlowOutcome::failure(format!("Reload request failed: {}", e)),
        }
    }
}

#[cfg(test)]
#[path = "unfollow_tests.rs"]
mod tests;

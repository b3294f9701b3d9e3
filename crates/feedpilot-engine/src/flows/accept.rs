//! Accept-invitation flow for the invitation manager page.

use std::sync::Arc;

use feedpilot_protocols::{
    AcceptReport, Background, CardError, ElementRef, FlowError, Page,
};
use tracing::{debug, info, warn};

use super::selectors;
use super::{FlowSettings, MSG_ALREADY_PROCESSING, MSG_NO_INVITATIONS, MSG_WRONG_PAGE};
use crate::pacer::Pacer;
use crate::session::FlowSession;

/// An invitation card with a visible accept control.
struct EligibleCard {
    card: ElementRef,
    accept: ElementRef,
}

pub struct AcceptFlow {
    page: Arc<dyn Page>,
    session: Arc<FlowSession>,
    background: Arc<dyn Background>,
    pacer: Pacer,
    settings: FlowSettings,
}

impl AcceptFlow {
    pub fn new(
        page: Arc<dyn Page>,
        session: Arc<FlowSession>,
        background: Arc<dyn Background>,
        pacer: Pacer,
        settings: FlowSettings,
    ) -> Self {
        Self {
            page,
            session,
            background,
            pacer,
            settings,
        }
    }

    /// Accept up to `max_count` invitations, one card at a time in page order.
    ///
    /// Fails fast when not on the invitation manager page. A failing card is
    /// recorded in `errors` and the remaining cards are still processed.
    pub async fn run(&self, max_count: usize) -> Result<AcceptReport, FlowError> {
        let Some(_guard) = self.session.try_begin() else {
            return Ok(AcceptReport::failed(MSG_ALREADY_PROCESSING));
        };

        let url = self.page.url().await?;
        if !url.contains(&self.settings.invitation_url_marker) {
            return Err(FlowError::WrongPage(MSG_WRONG_PAGE.to_string()));
        }

        tokio::time::sleep(self.settings.accept_settle).await;

        let eligible = self.eligible_cards().await?;
        if eligible.is_empty() {
            info!("{}", MSG_NO_INVITATIONS);
            return Ok(AcceptReport {
                success: true,
                message: Some(MSG_NO_INVITATIONS.to_string()),
                ..Default::default()
            });
        }

        let to_process = max_count.min(eligible.len());
        info!(
            "Found {} pending invitations, processing {}",
            eligible.len(),
            to_process
        );

        let mut processed = 0;
        let mut errors = Vec::new();
        for (index, card) in eligible.iter().take(to_process).enumerate() {
            match self.accept_card(card).await {
                Ok(()) => processed += 1,
                Err(e) => {
                    warn!("Failed to accept invitation {}: {}", index + 1, e);
                    errors.push(CardError {
                        index: index + 1,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(AcceptReport {
            success: true,
            processed,
            errors,
            total: eligible.len(),
            message: None,
            error: None,
        })
    }

    async fn eligible_cards(&self) -> Result<Vec<EligibleCard>, FlowError> {
        let page = self.page.as_ref();
        let accept = selectors::accept_button();
        let mut eligible = Vec::new();

        for card in page.query_all(selectors::INVITATION_CARD).await? {
            if let Some(found) = accept.find_within(page, &card).await? {
                eligible.push(EligibleCard {
                    card,
                    accept: found.element,
                });
            }
        }
        Ok(eligible)
    }

    async fn profile_url(&self, card: &ElementRef) -> Result<Option<String>, FlowError> {
        let links = self
            .page
            .query_within(card, selectors::PROFILE_LINK)
            .await?;
        match links.first() {
            Some(link) => Ok(self.page.inspect(link).await?.href),
            None => Ok(None),
        }
    }

    async fn accept_card(&self, card: &EligibleCard) -> Result<(), FlowError> {
        let profile_url = self.profile_url(&card.card).await?;

        self.page.click(&card.accept).await?;
        self.pacer.after_accept().await;

        match profile_url {
            Some(url) => self.open_profile(&url).await,
            None => warn!("No profile link on invitation card"),
        }

        self.pacer.between_cards().await;
        Ok(())
    }

    /// Open the accepted profile behind the current tab. Failures are logged
    /// only; the invitation itself was already accepted.
    async fn open_profile(&self, url: &str) {
        match self.background.create_background_tab(url).await {
            Ok(created) if created.success => debug!("Opened {} in background", url),
            Ok(created) => warn!(
                "Background tab for {} not created: {}",
                url,
                created.error.unwrap_or_default()
            ),
            Err(e) => warn!("Background tab request for {} failed: {}", url, e),
        }
    }
}

#[cfg(test)]
#[path = "accept_tests.rs"]
mod tests;

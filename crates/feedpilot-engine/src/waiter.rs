//! Element waiter.

use std::time::Duration;

use feedpilot_protocols::{Page, PageError};
use tracing::debug;

use crate::locator::{Found, Locator};

/// Default time to wait for an element.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Waits for a visible element, re-checking on every DOM mutation.
#[derive(Debug, Clone, Copy)]
pub struct ElementWaiter {
    default_timeout: Duration,
}

impl Default for ElementWaiter {
    fn default() -> Self {
        Self::new(DEFAULT_WAIT_TIMEOUT)
    }
}

impl ElementWaiter {
    pub fn new(default_timeout: Duration) -> Self {
        Self { default_timeout }
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Wait for `locator` to yield a visible match.
    ///
    /// Resolves immediately if a match already exists. Returns `None` once
    /// `timeout` (or the default) elapses.
    pub async fn wait(
        &self,
        page: &dyn Page,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> Result<Option<Found>, PageError> {
        let found = self
            .wait_for_any(page, std::slice::from_ref(locator), timeout)
            .await?;
        Ok(found.map(|(_, found)| found))
    }

    /// Wait for the first of `locators` to yield a visible match.
    ///
    /// Each check evaluates the locators in order, so an earlier locator wins
    /// when several match at once. Returns the winning locator's index.
    pub async fn wait_for_any(
        &self,
        page: &dyn Page,
        locators: &[Locator],
        timeout: Option<Duration>,
    ) -> Result<Option<(usize, Found)>, PageError> {
        let timeout = timeout.unwrap_or(self.default_timeout);

        // Subscribe before the first check so no mutation slips between them.
        // The subscription is dropped on every return path below.
        let mut subscription = page.mutations();

        if let Some(found) = check(page, locators).await? {
            return Ok(Some(found));
        }

        let watch = async {
            while subscription.changed().await {
                if let Some(found) = check(page, locators).await? {
                    return Ok(Some(found));
                }
            }
            debug!("Mutation source closed while waiting");
            Ok(None)
        };

        match tokio::time::timeout(timeout, watch).await {
            Ok(result) => result,
            Err(_) => {
                debug!(
                    "Timed out after {:?} waiting for {}",
                    timeout,
                    describe(locators)
                );
                Ok(None)
            }
        }
    }
}

async fn check(
    page: &dyn Page,
    locators: &[Locator],
) -> Result<Option<(usize, Found)>, PageError> {
    for (index, locator) in locators.iter().enumerate() {
        if let Some(found) = locator.find(page).await? {
            return Ok(Some((index, found)));
        }
    }
    Ok(None)
}

fn describe(locators: &[Locator]) -> String {
    locators
        .iter()
        .map(|l| l.description())
        .collect::<Vec<_>>()
        .join(" / ")
}

#[cfg(test)]
#[path = "waiter_tests.rs"]
mod tests;

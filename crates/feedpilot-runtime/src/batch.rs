//! Batch coordinator: one flow per tab, fanned out and gathered.

use std::time::Duration;

use async_trait::async_trait;
use feedpilot_config::{BatchConfig, DelayRange};
use feedpilot_engine::flows::MSG_RELOADING;
use feedpilot_engine::pacer;
use feedpilot_protocols::{BatchReport, FlowOutcome, MessengerError, TabId, TabOutcome};
use futures::future::join_all;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::agent::TabClient;

/// Something the coordinator can start the unfollow flow on.
#[async_trait]
pub trait FlowTarget: Send + Sync {
    fn tab_id(&self) -> &TabId;

    async fn start_bulk_unfollow(&self) -> Result<FlowOutcome, MessengerError>;
}

#[async_trait]
impl FlowTarget for TabClient {
    fn tab_id(&self) -> &TabId {
        TabClient::tab_id(self)
    }

    async fn start_bulk_unfollow(&self) -> Result<FlowOutcome, MessengerError> {
        TabClient::start_bulk_unfollow(self).await
    }
}

pub struct BatchCoordinator {
    start_offset: DelayRange,
    retry_settle: Duration,
}

impl BatchCoordinator {
    pub fn new(config: &BatchConfig) -> Self {
        Self {
            start_offset: config.start_offset,
            retry_settle: Duration::from_millis(config.retry_settle_ms),
        }
    }

    /// Run the unfollow flow on every target concurrently.
    ///
    /// Each target starts after its own random offset. A target that asks
    /// for a reload is invoked once more after the reload settles. Outcomes
    /// are returned in target order.
    pub async fn run_unfollow<T: FlowTarget>(&self, targets: &[T]) -> BatchReport {
        info!("Starting unfollow on {} tabs", targets.len());
        let runs = targets.iter().map(|target| {
            let span = info_span!("batch", tab = %target.tab_id());
            self.run_one(target).instrument(span)
        });
        let report = BatchReport::from_outcomes(join_all(runs).await);
        info!(
            "Unfollow batch finished: {}/{} successful",
            report.successful, report.total
        );
        report
    }

    async fn run_one<T: FlowTarget>(&self, target: &T) -> TabOutcome {
        pacer::delay(self.start_offset.min_ms, self.start_offset.max_ms).await;

        let mut outcome = invoke(target).await;
        if !outcome.success && outcome.message == MSG_RELOADING {
            debug!("Tab reloading, retrying in {:?}", self.retry_settle);
            tokio::time::sleep(self.retry_settle).await;
            outcome = invoke(target).await;
        }

        TabOutcome {
            tab_id: target.tab_id().clone(),
            outcome,
        }
    }
}

async fn invoke<T: FlowTarget>(target: &T) -> FlowOutcome {
    match target.start_bulk_unfollow().await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Unfollow request to {} failed: {}", target.tab_id(), e);
            FlowOutcome::failure(e.to_string())
        }
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;

//! Randomized pacing between simulated UI actions.

use std::time::Duration;

use feedpilot_config::{DelayRange, PacingConfig};
use rand::Rng;
use tracing::trace;

/// Draw a uniformly random delay from `[min_ms, max_ms]`.
///
/// An inverted or empty range yields `min_ms`.
pub fn draw(min_ms: u64, max_ms: u64) -> Duration {
    if max_ms <= min_ms {
        return Duration::from_millis(min_ms);
    }
    Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
}

/// Suspend for a random number of milliseconds in `[min_ms, max_ms]`.
pub async fn delay(min_ms: u64, max_ms: u64) {
    let duration = draw(min_ms, max_ms);
    trace!("Pacing for {:?}", duration);
    tokio::time::sleep(duration).await;
}

/// Named pacing points backed by [`PacingConfig`].
#[derive(Debug, Clone, Default)]
pub struct Pacer {
    pacing: PacingConfig,
}

impl Pacer {
    pub fn new(pacing: PacingConfig) -> Self {
        Self { pacing }
    }

    /// A pacer whose every delay is zero.
    pub fn instant() -> Self {
        let zero = DelayRange::fixed(0);
        Self::new(PacingConfig {
            initial: zero,
            before_click: zero,
            after_click: zero,
            after_menu: zero,
            after_accept: zero,
            between_cards: zero,
        })
    }

    pub fn pacing(&self) -> &PacingConfig {
        &self.pacing
    }

    pub async fn pause(&self, range: DelayRange) {
        delay(range.min_ms, range.max_ms).await;
    }

    pub async fn initial(&self) {
        self.pause(self.pacing.initial).await;
    }

    pub async fn before_click(&self) {
        self.pause(self.pacing.before_click).await;
    }

    pub async fn after_click(&self) {
        self.pause(self.pacing.after_click).await;
    }

    pub async fn after_menu(&self) {
        self.pause(self.pacing.after_menu).await;
    }

    pub async fn after_accept(&self) {
        self.pause(self.pacing.after_accept).await;
    }

    pub async fn between_cards(&self) {
        self.pause(self.pacing.between_cards).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn test_draw_within_bounds() {
        for _ in 0..500 {
            let d = draw(300, 800).as_millis() as u64;
            assert!((300..=800).contains(&d));
        }
    }

    #[test]
    fn test_draw_hits_both_ends_eventually() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            seen.insert(draw(1, 3).as_millis());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_draw_degenerate_ranges() {
        assert_eq!(draw(500, 500), Duration::from_millis(500));
        assert_eq!(draw(900, 100), Duration::from_millis(900));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_sleeps_within_range() {
        let start = Instant::now();
        delay(1000, 2000).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1000));
        assert!(elapsed <= Duration::from_millis(2001));
    }

    #[tokio::test(start_paused = true)]
    async fn test_instant_pacer() {
        let pacer = Pacer::instant();
        let start = Instant::now();
        pacer.after_menu().await;
        pacer.between_cards().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}

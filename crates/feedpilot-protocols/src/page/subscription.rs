//! Mutation notification subscriptions.

use tokio::sync::broadcast;

/// Receives one notification per observed batch of document mutations.
///
/// Dropping the subscription detaches it from the page.
pub struct MutationSubscription {
    rx: broadcast::Receiver<()>,
}

impl MutationSubscription {
    pub fn new(rx: broadcast::Receiver<()>) -> Self {
        Self { rx }
    }

    /// Wait for the next mutation notification.
    ///
    /// Returns `false` once the page side has gone away. A lagging receiver
    /// counts as a notification: something changed, re-check the DOM.
    pub async fn changed(&mut self) -> bool {
        match self.rx.recv().await {
            Ok(()) => true,
            Err(broadcast::error::RecvError::Lagged(_)) => true,
            Err(broadcast::error::RecvError::Closed) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_changed_receives_notification() {
        let (tx, rx) = broadcast::channel(4);
        let mut sub = MutationSubscription::new(rx);
        tx.send(()).unwrap();
        assert!(sub.changed().await);
    }

    #[tokio::test]
    async fn test_changed_false_when_closed() {
        let (tx, rx) = broadcast::channel::<()>(4);
        let mut sub = MutationSubscription::new(rx);
        drop(tx);
        assert!(!sub.changed().await);
    }

    #[tokio::test]
    async fn test_drop_detaches_receiver() {
        let (tx, rx) = broadcast::channel::<()>(4);
        let sub = MutationSubscription::new(rx);
        assert_eq!(tx.receiver_count(), 1);
        drop(sub);
        assert_eq!(tx.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_lagged_counts_as_change() {
        let (tx, rx) = broadcast::channel(1);
        let mut sub = MutationSubscription::new(rx);
        tx.send(()).unwrap();
        tx.send(()).unwrap();
        assert!(sub.changed().await);
    }
}

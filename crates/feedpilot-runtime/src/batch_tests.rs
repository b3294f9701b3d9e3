use super::*;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::time::Instant;

struct MockTarget {
    tab: TabId,
    script: Mutex<VecDeque<Result<FlowOutcome, MessengerError>>>,
    invoked_at: Mutex<Vec<Instant>>,
}

impl MockTarget {
    fn new(tab: &str, script: Vec<Result<FlowOutcome, MessengerError>>) -> Self {
        Self {
            tab: TabId::new(tab),
            script: Mutex::new(script.into()),
            invoked_at: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.invoked_at.lock().len()
    }
}

#[async_trait]
impl FlowTarget for MockTarget {
    fn tab_id(&self) -> &TabId {
        &self.tab
    }

    async fn start_bulk_unfollow(&self) -> Result<FlowOutcome, MessengerError> {
        self.invoked_at.lock().push(Instant::now());
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(FlowOutcome::failure("script exhausted")))
    }
}

fn coordinator() -> BatchCoordinator {
    BatchCoordinator::new(&BatchConfig::default())
}

#[tokio::test(start_paused = true)]
async fn test_aggregates_in_target_order() {
    let targets = vec![
        MockTarget::new("a", vec![Ok(FlowOutcome::success("Unfollow completed successfully", true))]),
        MockTarget::new("b", vec![Ok(FlowOutcome::failure("No confirmation button found"))]),
        MockTarget::new("c", vec![Ok(FlowOutcome::success("Not following this profile", false))]),
    ];

    let report = coordinator().run_unfollow(&targets).await;

    assert_eq!(report.summary(), (2, 3));
    let tabs: Vec<&str> = report.outcomes.iter().map(|o| o.tab_id.as_str()).collect();
    assert_eq!(tabs, vec!["a", "b", "c"]);
    assert_eq!(report.outcomes[1].outcome.message, "No confirmation button found");
}

#[tokio::test(start_paused = true)]
async fn test_reloading_tab_is_reinvoked_once() {
    let targets = vec![
        MockTarget::new(
            "recovers",
            vec![
                Ok(FlowOutcome::failure(MSG_RELOADING)),
                Ok(FlowOutcome::success("Unfollow completed successfully", true)),
            ],
        ),
        MockTarget::new(
            "gives-up",
            vec![
                Ok(FlowOutcome::failure(MSG_RELOADING)),
                Ok(FlowOutcome::failure(MSG_RELOADING)),
            ],
        ),
    ];

    let report = coordinator().run_unfollow(&targets).await;

    assert_eq!(report.summary(), (1, 2));
    assert_eq!(targets[0].calls(), 2);
    assert_eq!(targets[1].calls(), 2);

    let settle = Duration::from_millis(BatchConfig::default().retry_settle_ms);
    let calls = targets[0].invoked_at.lock().clone();
    assert!(calls[1] - calls[0] >= settle);
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_is_per_tab() {
    let targets = vec![
        MockTarget::new("gone", vec![Err(MessengerError::Disconnected)]),
        MockTarget::new("ok", vec![Ok(FlowOutcome::success("Unfollow completed successfully", true))]),
    ];

    let report = coordinator().run_unfollow(&targets).await;

    assert_eq!(report.summary(), (1, 2));
    assert!(!report.outcomes[0].outcome.success);
    assert_eq!(report.outcomes[0].outcome.message, "Receiving context is gone");
}

#[tokio::test(start_paused = true)]
async fn test_offsets_are_random_and_concurrent() {
    let targets: Vec<MockTarget> = ["t1", "t2", "t3", "t4", "t5", "t6"]
        .iter()
        .map(|t| MockTarget::new(t, vec![Ok(FlowOutcome::success("ok", true))]))
        .collect();

    let start = Instant::now();
    let report = coordinator().run_unfollow(&targets).await;

    assert_eq!(report.summary(), (6, 6));
    for target in &targets {
        let offset = target.invoked_at.lock()[0] - start;
        assert!(offset >= Duration::from_millis(1000));
        assert!(offset <= Duration::from_millis(5000));
    }
    // Fan-out: the whole batch takes no longer than the largest offset.
    assert!(start.elapsed() <= Duration::from_millis(5000));
}

#[tokio::test(start_paused = true)]
async fn test_empty_batch() {
    let targets: Vec<MockTarget> = Vec::new();
    let report = coordinator().run_unfollow(&targets).await;
    assert_eq!(report.summary(), (0, 0));
}

use super::*;
use parking_lot::Mutex;

#[derive(Default)]
struct MockTabHost {
    calls: Mutex<Vec<String>>,
    fail_create: bool,
}

impl MockTabHost {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TabHost for MockTabHost {
    async fn create_tab(&self, url: &str, active: bool) -> Result<TabId, MessengerError> {
        self.calls
            .lock()
            .push(format!("create {} active={}", url, active));
        if self.fail_create {
            return Err(MessengerError::Rejected("tab limit".to_string()));
        }
        Ok(TabId::new("new-tab"))
    }

    async fn activate_tab(&self, tab: &TabId) -> Result<(), MessengerError> {
        self.calls.lock().push(format!("activate {}", tab));
        Ok(())
    }

    async fn reload_tab(&self, tab: &TabId) -> Result<(), MessengerError> {
        self.calls.lock().push(format!("reload {}", tab));
        Ok(())
    }

    async fn close_tab(&self, tab: &TabId) -> Result<(), MessengerError> {
        self.calls.lock().push(format!("close {}", tab));
        Ok(())
    }

    async fn list_tabs(&self) -> Result<Vec<feedpilot_protocols::TabInfo>, MessengerError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_create_background_tab_restores_focus() {
    let host = Arc::new(MockTabHost::default());
    let (handle, _task) = BackgroundService::spawn(host.clone());
    let tab = handle.for_tab(TabId::new("T1"));

    let created = tab
        .create_background_tab("https://www.linkedin.com/in/jane/")
        .await
        .unwrap();

    assert!(created.success);
    assert_eq!(created.tab_id, Some(TabId::new("new-tab")));
    assert_eq!(
        host.calls(),
        vec![
            "create https://www.linkedin.com/in/jane/ active=false",
            "activate T1"
        ]
    );
}

#[tokio::test]
async fn test_create_failure_is_reported() {
    let host = Arc::new(MockTabHost {
        fail_create: true,
        ..Default::default()
    });
    let (handle, _task) = BackgroundService::spawn(host.clone());

    let created = handle
        .for_tab(TabId::new("T1"))
        .create_background_tab("https://example.com")
        .await
        .unwrap();

    assert!(!created.success);
    assert!(created.error.unwrap().contains("tab limit"));
    assert_eq!(host.calls().len(), 1);
}

#[tokio::test]
async fn test_reload_and_close_target_sender() {
    let host = Arc::new(MockTabHost::default());
    let (handle, _task) = BackgroundService::spawn(host.clone());
    let tab = handle.for_tab(TabId::new("T7"));

    tab.reload_tab().await.unwrap();
    tab.close_tab().await.unwrap();

    assert_eq!(host.calls(), vec!["reload T7", "close T7"]);
}

#[tokio::test]
async fn test_reload_without_sender() {
    let host = Arc::new(MockTabHost::default());
    let (handle, _task) = BackgroundService::spawn(host.clone());

    match handle.reload_tab().await {
        Err(MessengerError::Rejected(msg)) => assert_eq!(msg, "No tab ID"),
        other => panic!("Expected Rejected, got {:?}", other),
    }
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_unsupported_action() {
    let host = Arc::new(MockTabHost::default());
    let (handle, _task) = BackgroundService::spawn(host);

    let response = handle
        .for_tab(TabId::new("T1"))
        .send(Request::StartBulkUnfollow)
        .await
        .unwrap();

    match response {
        Response::Ack(ack) => {
            assert!(!ack.success);
            assert!(ack.error.unwrap().contains("startBulkUnfollow"));
        }
        other => panic!("Expected Ack, got {:?}", other),
    }
}

#[tokio::test]
async fn test_send_after_service_dropped() {
    let host = Arc::new(MockTabHost::default());
    let (service, handle) = BackgroundService::new(host);
    drop(service);

    let result = handle.send(Request::ReloadTab).await;
    assert!(matches!(result, Err(MessengerError::Disconnected)));
}

#[tokio::test]
async fn test_handle_request_close() {
    let host = MockTabHost::default();
    let tab = TabId::new("T3");

    let response = handle_request(&host, Some(&tab), Request::CloseTab).await;

    assert!(response.success());
    assert_eq!(host.calls(), vec!["close T3"]);
}

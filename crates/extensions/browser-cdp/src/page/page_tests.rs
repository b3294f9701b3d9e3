use super::*;
use serde_json::json;

fn event(method: &str, params: serde_json::Value) -> CdpEvent {
    CdpEvent {
        method: method.to_string(),
        params,
        session_id: Some("S1".to_string()),
    }
}

#[tokio::test]
async fn test_pump_forwards_binding_and_navigation() {
    let (events_tx, events_rx) = broadcast::channel(8);
    let (mutations_tx, _) = broadcast::channel(8);
    let mut rx = mutations_tx.subscribe();
    let pump = tokio::spawn(pump_events(events_rx, mutations_tx.clone()));

    events_tx
        .send(event("Network.dataReceived", json!({})))
        .unwrap();
    events_tx
        .send(event(
            "Runtime.bindingCalled",
            json!({"name": MUTATION_BINDING, "payload": ""}),
        ))
        .unwrap();
    rx.recv().await.unwrap();

    events_tx
        .send(event("Runtime.bindingCalled", json!({"name": "other"})))
        .unwrap();
    events_tx
        .send(event("Page.frameNavigated", json!({"frame": {}})))
        .unwrap();
    rx.recv().await.unwrap();

    drop(events_tx);
    pump.await.unwrap();
    // One notification per relevant event, nothing for the rest.
    assert!(matches!(
        rx.try_recv(),
        Err(broadcast::error::TryRecvError::Empty)
    ));
}

#[test]
fn test_query_all_escapes_selector() {
    let script = scripts::query_all(r#"button[aria-label*="Following"]"#);
    assert!(script.contains(r#""button[aria-label*=\"Following\"]""#));
    assert!(script.contains("__fpStamp"));
}

#[test]
fn test_element_scripts_reference_ref() {
    let el = ElementRef::new("k2x9-14");
    for script in [
        scripts::inspect(&el),
        scripts::click_target(&el),
        scripts::scroll_into_view(&el),
        scripts::query_within(&el, "a"),
    ] {
        assert!(script.contains(r#"__fpFind("k2x9-14")"#), "{}", script);
        assert!(script.starts_with("(() => {"));
        assert!(script.ends_with("})()"));
    }
}

#[test]
fn test_observer_calls_binding() {
    let script = scripts::observer_install();
    assert!(script.contains("MutationObserver"));
    assert!(script.contains(&format!("window.{}('')", MUTATION_BINDING)));
    assert!(script.contains("__fpObserver"));
}

#[test]
fn test_decoration_scripts() {
    let el = ElementRef::new("a-1");
    let mask = scripts::decorate(&el, Decoration::Mask);
    assert!(mask.contains("blur(10px)"));
    assert!(mask.contains("Click to View"));
    assert!(mask.contains("feed-shared-update-v2__control-menu-container"));

    let highlight = scripts::decorate(&el, Decoration::Highlight);
    assert!(highlight.contains("AI Job"));
    assert!(highlight.contains("magenta"));
    assert!(!highlight.contains("blur(10px)"));
}

#[test]
fn test_click_target_deserialize() {
    let target: Option<ClickTarget> =
        serde_json::from_value(json!({"found": true, "point": {"x": 12.5, "y": 40}})).unwrap();
    let point = target.unwrap().point.unwrap();
    assert_eq!((point.x, point.y), (12.5, 40.0));

    let target: Option<ClickTarget> = serde_json::from_value(json!(null)).unwrap();
    assert!(target.is_none());
}

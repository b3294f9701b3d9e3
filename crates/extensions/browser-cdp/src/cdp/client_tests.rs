use super::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_discover_parses_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Browser": "Chrome/126.0.6478.126",
            "Protocol-Version": "1.3",
            "User-Agent": "Mozilla/5.0",
            "webSocketDebuggerUrl": "ws://127.0.0.1:9222/devtools/browser/abc"
        })))
        .mount(&server)
        .await;

    let version = CdpClient::discover(&format!("{}/", server.uri()))
        .await
        .unwrap();
    assert_eq!(version.browser, "Chrome/126.0.6478.126");
    assert!(version.web_socket_debugger_url.ends_with("/browser/abc"));
}

#[tokio::test]
async fn test_discover_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/version"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = CdpClient::discover(&server.uri()).await.unwrap_err();
    assert!(matches!(err, CdpError::ChromeNotAvailable(_)));
}

#[tokio::test]
async fn test_page_list_keeps_pages_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "A", "type": "page", "title": "Jane Doe | LinkedIn",
             "url": "https://www.linkedin.com/in/jane-doe/"},
            {"id": "B", "type": "service_worker", "title": "sw",
             "url": "https://www.linkedin.com/sw.js"},
            {"id": "C", "type": "page", "title": "Feed",
             "url": "https://www.linkedin.com/feed/"}
        ])))
        .mount(&server)
        .await;

    let pages = CdpClient::page_list(&server.uri()).await.unwrap();
    let ids: Vec<&str> = pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "C"]);
}

#[tokio::test]
async fn test_connect_fails_without_websocket() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Browser": "Chrome/126",
            "Protocol-Version": "1.3",
            "webSocketDebuggerUrl": "ws://127.0.0.1:1/devtools/browser/none"
        })))
        .mount(&server)
        .await;

    let result = CdpClient::connect(&server.uri()).await;
    assert!(matches!(result, Err(CdpError::ConnectionFailed(_))));
}

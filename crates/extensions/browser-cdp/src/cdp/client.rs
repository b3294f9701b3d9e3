//! CDP WebSocket client.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};

use super::error::CdpError;
use super::protocol::{BrowserVersion, CdpEvent, CdpRequest, CdpResponse, PageInfo, TargetInfo};
use super::session::PageSession;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

type PendingMap = HashMap<u64, oneshot::Sender<Result<Value, CdpError>>>;
type EventMap = HashMap<String, broadcast::Sender<CdpEvent>>;

const CALL_TIMEOUT: Duration = Duration::from_secs(30);
const EVENT_CAPACITY: usize = 256;

/// The browser connection shared by the client and every page session.
pub(crate) struct Transport {
    ws_tx: tokio::sync::Mutex<WsSink>,
    request_id: AtomicU64,
    pending: Mutex<PendingMap>,
    events: Mutex<EventMap>,
}

impl Transport {
    /// Send a command and wait for its response.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(|s| s.to_string()),
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        {
            let mut ws = self.ws_tx.lock().await;
            if let Err(e) = ws.send(Message::Text(json.into())).await {
                self.pending.lock().remove(&id);
                return Err(e.into());
            }
        }

        match tokio::time::timeout(CALL_TIMEOUT, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("Request {} timed out", method)))
            }
        }
    }

    /// Subscribe to events of one session.
    pub(crate) fn subscribe(&self, session_id: &str) -> broadcast::Receiver<CdpEvent> {
        self.events
            .lock()
            .entry(session_id.to_string())
            .or_insert_with(|| broadcast::channel(EVENT_CAPACITY).0)
            .subscribe()
    }

    fn dispatch(&self, message: CdpResponse) {
        if let Some(id) = message.id {
            let Some(tx) = self.pending.lock().remove(&id) else {
                return;
            };
            let result = match message.error {
                Some(error) => Err(CdpError::Protocol {
                    code: error.code,
                    message: error.message,
                }),
                None => Ok(message.result.unwrap_or(Value::Null)),
            };
            let _ = tx.send(result);
            return;
        }

        if let Some(event) = message.into_event() {
            let key = event.session_id.clone().unwrap_or_default();
            if event.method == "Target.detachedFromTarget" {
                if let Some(detached) = event.params["sessionId"].as_str() {
                    self.events.lock().remove(detached);
                }
            }
            if let Some(tx) = self.events.lock().get(&key) {
                let _ = tx.send(event);
            }
        }
    }

    /// Fail every in-flight call and close every event stream.
    fn shutdown(&self) {
        self.pending.lock().clear();
        self.events.lock().clear();
    }
}

/// CDP client for one browser.
pub struct CdpClient {
    http_endpoint: String,
    browser_ws_url: String,
    transport: Arc<Transport>,
    recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Fetch `/json/version` from a debugging endpoint.
    pub async fn discover(endpoint: &str) -> Result<BrowserVersion, CdpError> {
        let version_url = format!("{}/json/version", endpoint.trim_end_matches('/'));
        debug!("Fetching browser version from {}", version_url);

        reqwest::get(&version_url)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?
            .json()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))
    }

    /// Fetch the page targets listed by `/json/list`.
    pub async fn page_list(endpoint: &str) -> Result<Vec<PageInfo>, CdpError> {
        let url = format!("{}/json/list", endpoint.trim_end_matches('/'));
        let targets: Vec<PageInfo> = reqwest::get(&url)
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(targets
            .into_iter()
            .filter(|t| t.page_type == "page")
            .collect())
    }

    /// Connect to Chrome at the given endpoint (e.g. `http://localhost:9222`).
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/').to_string();
        let version = Self::discover(&http_endpoint).await?;
        debug!("Connected to browser: {}", version.browser);

        let browser_ws_url = version.web_socket_debugger_url;
        let (ws_stream, _) = tokio_tungstenite::connect_async(&browser_ws_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let transport = Arc::new(Transport {
            ws_tx: tokio::sync::Mutex::new(ws_sink),
            request_id: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
            events: Mutex::new(HashMap::new()),
        });

        let recv_task = tokio::spawn(Self::receive_loop(ws_source, Arc::clone(&transport)));

        debug!("CDP client connected to {}", browser_ws_url);
        Ok(Self {
            http_endpoint,
            browser_ws_url,
            transport,
            recv_task,
        })
    }

    async fn receive_loop(mut ws_source: WsSource, transport: Arc<Transport>) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    match serde_json::from_str::<CdpResponse>(&text) {
                        Ok(message) => transport.dispatch(message),
                        Err(e) => warn!("Failed to parse CDP message: {}", e),
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("WebSocket closed");
                    break;
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
        transport.shutdown();
    }

    /// Send a browser-level CDP command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport.call(method, params, None).await
    }

    pub fn http_endpoint(&self) -> &str {
        &self.http_endpoint
    }

    pub fn browser_ws_url(&self) -> &str {
        &self.browser_ws_url
    }

    /// True while the WebSocket receive loop is running.
    pub fn is_connected(&self) -> bool {
        !self.recv_task.is_finished()
    }

    /// Open a tab. With `background` set the tab does not take focus.
    pub async fn create_target(&self, url: &str, background: bool) -> Result<String, CdpError> {
        let result = self
            .call(
                "Target.createTarget",
                Some(json!({
                    "url": url,
                    "background": background,
                })),
            )
            .await?;

        let target_id = result["targetId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing targetId".to_string()))?
            .to_string();
        debug!("Created target {} for {}", target_id, url);
        Ok(target_id)
    }

    /// Attach a flattened session to an existing target.
    pub async fn attach(&self, target_id: &str) -> Result<PageSession, CdpError> {
        let result = self
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": target_id,
                    "flatten": true
                })),
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        let session = PageSession::new(
            target_id.to_string(),
            session_id,
            Arc::clone(&self.transport),
        );
        session.enable_domains().await?;
        Ok(session)
    }

    /// Bring a target to the foreground.
    pub async fn activate_target(&self, target_id: &str) -> Result<(), CdpError> {
        self.call(
            "Target.activateTarget",
            Some(json!({"targetId": target_id})),
        )
        .await?;
        Ok(())
    }

    pub async fn close_target(&self, target_id: &str) -> Result<(), CdpError> {
        self.call("Target.closeTarget", Some(json!({"targetId": target_id})))
            .await?;
        Ok(())
    }

    pub async fn get_targets(&self) -> Result<Vec<TargetInfo>, CdpError> {
        let result = self.call("Target.getTargets", None).await?;
        let targets: Vec<TargetInfo> = serde_json::from_value(result["targetInfos"].clone())?;
        Ok(targets)
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

//! Request/response channel between tab contexts and the background.

use std::sync::Arc;

use async_trait::async_trait;
use feedpilot_protocols::{
    Ack, Background, MessengerError, Request, Response, TabCreated, TabHost, TabId,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const CHANNEL_CAPACITY: usize = 64;

/// A request in flight to the background, with its sender and reply slot.
#[derive(Debug)]
pub struct Envelope {
    pub sender: Option<TabId>,
    pub request: Request,
    pub reply: oneshot::Sender<Response>,
}

/// Sending side of the background channel, bound to one sender tab.
#[derive(Clone)]
pub struct BackgroundHandle {
    tx: mpsc::Sender<Envelope>,
    sender: Option<TabId>,
}

impl BackgroundHandle {
    /// The same channel, sending on behalf of `tab`.
    pub fn for_tab(&self, tab: TabId) -> Self {
        Self {
            tx: self.tx.clone(),
            sender: Some(tab),
        }
    }

    pub fn sender(&self) -> Option<&TabId> {
        self.sender.as_ref()
    }
}

#[async_trait]
impl Background for BackgroundHandle {
    async fn send(&self, request: Request) -> Result<Response, MessengerError> {
        let action = request.action();
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope {
                sender: self.sender.clone(),
                request,
                reply,
            })
            .await
            .map_err(|_| MessengerError::Disconnected)?;
        rx.await
            .map_err(|_| MessengerError::NoReply(action.to_string()))
    }
}

/// The background context: serves tab lifecycle requests against a
/// [`TabHost`]. Each request is handled on its own task.
pub struct BackgroundService {
    host: Arc<dyn TabHost>,
    rx: mpsc::Receiver<Envelope>,
}

impl BackgroundService {
    pub fn new(host: Arc<dyn TabHost>) -> (Self, BackgroundHandle) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let handle = BackgroundHandle { tx, sender: None };
        (Self { host, rx }, handle)
    }

    /// Create the service and run it on a new task.
    pub fn spawn(host: Arc<dyn TabHost>) -> (BackgroundHandle, JoinHandle<()>) {
        let (service, handle) = Self::new(host);
        (handle, tokio::spawn(service.run()))
    }

    /// Serve until every handle is dropped.
    pub async fn run(mut self) {
        info!("Background service started");
        while let Some(envelope) = self.rx.recv().await {
            let host = Arc::clone(&self.host);
            tokio::spawn(async move {
                let response =
                    handle_request(host.as_ref(), envelope.sender.as_ref(), envelope.request)
                        .await;
                if envelope.reply.send(response).is_err() {
                    debug!("Requester went away before the reply");
                }
            });
        }
        info!("Background service stopped");
    }
}

/// Serve one request on behalf of `sender`.
pub async fn handle_request(
    host: &dyn TabHost,
    sender: Option<&TabId>,
    request: Request,
) -> Response {
    match request {
        Request::CreateBackgroundTab { url } => {
            Response::TabCreated(create_background_tab(host, sender, &url).await)
        }
        Request::ReloadTab => Response::Ack(on_sender(sender, "Reloading", |tab| async move {
            host.reload_tab(&tab).await
        })
        .await),
        Request::CloseTab => Response::Ack(on_sender(sender, "Closing", |tab| async move {
            host.close_tab(&tab).await
        })
        .await),
        other => {
            warn!("Background cannot serve '{}'", other.action());
            Response::Ack(Ack::unsupported(other.action()))
        }
    }
}

/// Open `url` without focus, then hand focus back to the sender.
async fn create_background_tab(
    host: &dyn TabHost,
    sender: Option<&TabId>,
    url: &str,
) -> TabCreated {
    info!("Creating background tab for: {}", url);
    let tab_id = match host.create_tab(url, false).await {
        Ok(tab_id) => tab_id,
        Err(e) => {
            warn!("Failed to create background tab: {}", e);
            return TabCreated {
                success: false,
                tab_id: None,
                error: Some(e.to_string()),
            };
        }
    };

    if let Some(sender) = sender {
        if let Err(e) = host.activate_tab(sender).await {
            warn!("Failed to restore focus to {}: {}", sender, e);
        }
    }

    TabCreated {
        success: true,
        tab_id: Some(tab_id),
        error: None,
    }
}

async fn on_sender<F, Fut>(sender: Option<&TabId>, verb: &str, op: F) -> Ack
where
    F: FnOnce(TabId) -> Fut,
    Fut: std::future::Future<Output = Result<(), MessengerError>>,
{
    let Some(tab) = sender else {
        return Ack::failed("No tab ID");
    };
    info!("{} tab: {}", verb, tab);
    match op(tab.clone()).await {
        Ok(()) => Ack::ok(),
        Err(e) => Ack::failed(e.to_string()),
    }
}

#[cfg(test)]
#[path = "messenger_tests.rs"]
mod tests;

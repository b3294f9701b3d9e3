//! Tab agent: the context that owns one page and runs flows in it.

use std::sync::Arc;
use std::time::Duration;

use feedpilot_config::Config;
use feedpilot_engine::{AcceptFlow, ElementWaiter, FlowSession, FlowSettings, Pacer, UnfollowFlow};
use feedpilot_protocols::{
    Ack, AcceptReport, FlowOutcome, MessengerError, Page, Request, Response, TabId,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info_span};

use crate::messenger::BackgroundHandle;

const CHANNEL_CAPACITY: usize = 16;

/// Pacing, waiting and page recognition used by a tab's flows.
#[derive(Debug, Clone, Default)]
pub struct AgentSettings {
    pub pacer: Pacer,
    pub waiter: ElementWaiter,
    pub flows: FlowSettings,
}

impl AgentSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            pacer: Pacer::new(config.pacing.clone()),
            waiter: ElementWaiter::new(Duration::from_millis(config.flows.waiter_timeout_ms)),
            flows: FlowSettings::from(&config.flows),
        }
    }
}

struct TabRequest {
    request: Request,
    reply: oneshot::Sender<Response>,
}

/// Handle for sending requests to a running [`TabAgent`].
#[derive(Clone)]
pub struct TabClient {
    tab: TabId,
    tx: mpsc::Sender<TabRequest>,
}

impl TabClient {
    pub fn tab_id(&self) -> &TabId {
        &self.tab
    }

    pub async fn send(&self, request: Request) -> Result<Response, MessengerError> {
        let action = request.action();
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(TabRequest { request, reply })
            .await
            .map_err(|_| MessengerError::Disconnected)?;
        rx.await
            .map_err(|_| MessengerError::NoReply(action.to_string()))
    }

    pub async fn start_bulk_unfollow(&self) -> Result<FlowOutcome, MessengerError> {
        match self.send(Request::StartBulkUnfollow).await? {
            Response::Flow(outcome) => Ok(outcome),
            other => Err(unexpected("startBulkUnfollow", other)),
        }
    }

    pub async fn accept_requests(&self, count: usize) -> Result<AcceptReport, MessengerError> {
        match self.send(Request::AcceptRequests { count }).await? {
            Response::Accept(report) => Ok(report),
            other => Err(unexpected("acceptRequests", other)),
        }
    }
}

fn unexpected(action: &str, response: Response) -> MessengerError {
    MessengerError::UnexpectedResponse {
        action: action.to_string(),
        response: format!("{:?}", response),
    }
}

/// Owns a page and its [`FlowSession`]. The session outlives page reloads,
/// so the reload-once policy holds across them.
pub struct TabAgent {
    tab: TabId,
    page: Arc<dyn Page>,
    session: Arc<FlowSession>,
    background: Arc<BackgroundHandle>,
    settings: AgentSettings,
}

impl TabAgent {
    pub fn new(
        tab: TabId,
        page: Arc<dyn Page>,
        background: &BackgroundHandle,
        settings: AgentSettings,
    ) -> Self {
        Self {
            background: Arc::new(background.for_tab(tab.clone())),
            tab,
            page,
            session: Arc::new(FlowSession::new()),
            settings,
        }
    }

    pub fn session(&self) -> &Arc<FlowSession> {
        &self.session
    }

    /// Run the agent on a new task. It stops once every client is dropped.
    pub fn spawn(self) -> (TabClient, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let client = TabClient {
            tab: self.tab.clone(),
            tx,
        };
        let handle = tokio::spawn(Arc::new(self).run(rx));
        (client, handle)
    }

    async fn run(self: Arc<Self>, mut rx: mpsc::Receiver<TabRequest>) {
        debug!("Tab agent {} started", self.tab);
        while let Some(TabRequest { request, reply }) = rx.recv().await {
            let agent = Arc::clone(&self);
            let span = info_span!("tab", tab = %self.tab, action = request.action());
            // Requests run concurrently; the flow session rejects overlap.
            tokio::spawn(
                async move {
                    let response = agent.handle(request).await;
                    if reply.send(response).is_err() {
                        debug!("Client went away before the reply");
                    }
                }
                .instrument(span),
            );
        }
        debug!("Tab agent {} stopped", self.tab);
    }

    /// Serve one request in this tab.
    pub async fn handle(&self, request: Request) -> Response {
        match request {
            Request::StartBulkUnfollow => Response::Flow(self.unfollow_flow().run().await),
            Request::AcceptRequests { count } => {
                let report = match self.accept_flow().run(count).await {
                    Ok(report) => report,
                    Err(e) => AcceptReport::failed(e.to_string()),
                };
                Response::Accept(report)
            }
            other => Response::Ack(Ack::unsupported(other.action())),
        }
    }

    fn unfollow_flow(&self) -> UnfollowFlow {
        UnfollowFlow::new(
            Arc::clone(&self.page),
            Arc::clone(&self.session),
            self.background.clone(),
            self.settings.pacer.clone(),
            self.settings.waiter,
            self.settings.flows.clone(),
        )
    }

    fn accept_flow(&self) -> AcceptFlow {
        AcceptFlow::new(
            Arc::clone(&self.page),
            Arc::clone(&self.session),
            self.background.clone(),
            self.settings.pacer.clone(),
            self.settings.flows.clone(),
        )
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;

//! Request channel from a tab context to the background context.

use async_trait::async_trait;

use crate::error::MessengerError;
use crate::message::{Request, Response, TabCreated};

/// What a tab context can ask of the background.
///
/// Implementors only provide [`send`](Background::send); the typed helpers
/// check that the reply has the shape the action promises.
#[async_trait]
pub trait Background: Send + Sync {
    /// Send a request on behalf of this tab and wait for the reply.
    async fn send(&self, request: Request) -> Result<Response, MessengerError>;

    /// Open `url` in a non-focused tab, keeping focus on this one.
    async fn create_background_tab(&self, url: &str) -> Result<TabCreated, MessengerError> {
        let request = Request::CreateBackgroundTab {
            url: url.to_string(),
        };
        match self.send(request).await? {
            Response::TabCreated(created) => Ok(created),
            other => Err(unexpected("createBackgroundTab", &other)),
        }
    }

    /// Ask the background to reload this tab.
    async fn reload_tab(&self) -> Result<(), MessengerError> {
        expect_ack("reloadTab", self.send(Request::ReloadTab).await?)
    }

    /// Ask the background to close this tab.
    async fn close_tab(&self) -> Result<(), MessengerError> {
        expect_ack("closeTab", self.send(Request::CloseTab).await?)
    }
}

fn expect_ack(action: &str, response: Response) -> Result<(), MessengerError> {
    match response {
        Response::Ack(ack) if ack.success => Ok(()),
        Response::Ack(ack) => Err(MessengerError::Rejected(
            ack.error.unwrap_or_else(|| format!("{} failed", action)),
        )),
        other => Err(unexpected(action, &other)),
    }
}

fn unexpected(action: &str, response: &Response) -> MessengerError {
    MessengerError::UnexpectedResponse {
        action: action.to_string(),
        response: serde_json::to_string(response).unwrap_or_else(|_| format!("{:?}", response)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Ack;
    use crate::outcome::FlowOutcome;

    struct Canned(Response);

    #[async_trait]
    impl Background for Canned {
        async fn send(&self, _request: Request) -> Result<Response, MessengerError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_reload_tab_ack() {
        let bg = Canned(Response::Ack(Ack::ok()));
        assert!(bg.reload_tab().await.is_ok());
    }

    #[tokio::test]
    async fn test_reload_tab_rejected() {
        let bg = Canned(Response::Ack(Ack::failed("No tab ID")));
        match bg.reload_tab().await {
            Err(MessengerError::Rejected(msg)) => assert_eq!(msg, "No tab ID"),
            other => panic!("Expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_close_tab_wrong_shape() {
        let bg = Canned(Response::Flow(FlowOutcome::failure("x")));
        assert!(matches!(
            bg.close_tab().await,
            Err(MessengerError::UnexpectedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_background_tab() {
        let bg = Canned(Response::TabCreated(TabCreated {
            success: true,
            tab_id: Some(crate::tab::TabId::new("T9")),
            error: None,
        }));
        let created = bg.create_background_tab("https://example.com").await.unwrap();
        assert!(created.success);
    }
}

//! Messages exchanged between the background context and tab contexts.
//!
//! Requests are tagged by their `action` name; each action has exactly one
//! response shape, so responses are decoded against the request that
//! produced them (see [`Request::decode_response`]).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::outcome::{AcceptReport, FlowOutcome};
use crate::tab::TabId;

/// A request addressed to another context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Open `url` in a tab that does not take focus.
    CreateBackgroundTab { url: String },
    /// Reload the sender's tab.
    ReloadTab,
    /// Close the sender's tab.
    CloseTab,
    /// Accept up to `count` pending invitations on the current page.
    AcceptRequests { count: usize },
    /// Run the unfollow flow on the current profile page.
    StartBulkUnfollow,
}

impl Request {
    /// Wire name of the action.
    pub fn action(&self) -> &'static str {
        match self {
            Request::CreateBackgroundTab { .. } => "createBackgroundTab",
            Request::ReloadTab => "reloadTab",
            Request::CloseTab => "closeTab",
            Request::AcceptRequests { .. } => "acceptRequests",
            Request::StartBulkUnfollow => "startBulkUnfollow",
        }
    }

    /// Decode a JSON response according to this request's action.
    pub fn decode_response(&self, value: Value) -> Result<Response, serde_json::Error> {
        Ok(match self {
            Request::CreateBackgroundTab { .. } => Response::TabCreated(serde_json::from_value(value)?),
            Request::ReloadTab | Request::CloseTab => Response::Ack(serde_json::from_value(value)?),
            Request::AcceptRequests { .. } => Response::Accept(serde_json::from_value(value)?),
            Request::StartBulkUnfollow => Response::Flow(serde_json::from_value(value)?),
        })
    }
}

/// Reply to `createBackgroundTab`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabCreated {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<TabId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Plain acknowledgement, used by `reloadTab` and `closeTab`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }

    pub fn unsupported(action: &str) -> Self {
        Self::failed(format!("Unsupported action '{}'", action))
    }
}

/// Any response. Serializes to the bare payload of its variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    TabCreated(TabCreated),
    Ack(Ack),
    Accept(AcceptReport),
    Flow(FlowOutcome),
}

impl Response {
    /// The `success` flag every response carries.
    pub fn success(&self) -> bool {
        match self {
            Response::TabCreated(r) => r.success,
            Response::Ack(r) => r.success,
            Response::Accept(r) => r.success,
            Response::Flow(r) => r.success,
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;

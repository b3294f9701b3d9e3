//! Cross-context messaging errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessengerError {
    #[error("Receiving context is gone")]
    Disconnected,

    #[error("No reply received for '{0}'")]
    NoReply(String),

    #[error("Unexpected response to '{action}': {response}")]
    UnexpectedResponse { action: String, response: String },

    #[error("Request rejected: {0}")]
    Rejected(String),
}

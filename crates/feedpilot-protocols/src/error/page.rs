//! Page access errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Page detached: {0}")]
    Detached(String),

    #[error("Element no longer attached: {0}")]
    StaleElement(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected page response: {0}")]
    InvalidResponse(String),
}

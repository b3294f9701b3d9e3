//! Classifier errors.

use feedpilot_protocols::PageError;
use feedpilot_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Malformed response: {0}")]
    InvalidResponse(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Page(#[from] PageError),
}

impl From<reqwest::Error> for ClassifierError {
    fn from(e: reqwest::Error) -> Self {
        ClassifierError::Network(e.to_string())
    }
}

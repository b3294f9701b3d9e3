//! Flow-level errors.
//!
//! Most flow failures are reported as structured outcomes; these cover the
//! cases a flow surfaces before it starts working on the page.

use thiserror::Error;

use super::{MessengerError, PageError};

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("{0}")]
    WrongPage(String),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Messenger(#[from] MessengerError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_page_display_is_bare_message() {
        let err = FlowError::WrongPage("Not on invitation manager page".to_string());
        assert_eq!(err.to_string(), "Not on invitation manager page");
    }

    #[test]
    fn test_from_page_error() {
        let err: FlowError = PageError::Script("boom".to_string()).into();
        assert!(matches!(err, FlowError::Page(_)));
        assert_eq!(err.to_string(), "Script error: boom");
    }
}

//! # feedpilot config
//!
//! TOML configuration for the feedpilot workspace: browser connection,
//! action pacing, flow timeouts, batch fan-out, the classification endpoint
//! and local storage.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};

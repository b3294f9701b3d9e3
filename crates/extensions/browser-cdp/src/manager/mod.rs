//! Browser instance manager.
//!
//! Attaches to Chrome on the debugging port, launching it with a persistent
//! profile (to keep the login) when nothing is listening there.

mod manager_core;
mod manager_host;
mod manager_types;

pub use manager_core::BrowserManager;
pub use manager_types::{BrowserError, BrowserManagerConfig};

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;

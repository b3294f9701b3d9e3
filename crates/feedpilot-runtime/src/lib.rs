//! # feedpilot runtime
//!
//! Hosts the contexts the flows run in:
//!
//! - [`BackgroundService`] owns the [`TabHost`](feedpilot_protocols::TabHost)
//!   and serves tab lifecycle requests from tab contexts
//! - [`TabAgent`] owns one page and its flow session, and runs flows on request
//! - [`BatchCoordinator`] fans a flow out across tabs and aggregates outcomes

pub mod agent;
pub mod batch;
pub mod messenger;

pub use agent::{AgentSettings, TabAgent, TabClient};
pub use batch::{BatchCoordinator, FlowTarget};
pub use messenger::{BackgroundHandle, BackgroundService, Envelope};

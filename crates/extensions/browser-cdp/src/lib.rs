//! # feedpilot browser-cdp
//!
//! Drives Chrome through the DevTools Protocol.
//!
//! - [`CdpPage`] implements [`Page`](feedpilot_protocols::Page) for one tab
//! - [`BrowserManager`] launches or attaches to Chrome and implements
//!   [`TabHost`](feedpilot_protocols::TabHost)
//!
//! Chrome must be reachable with remote debugging enabled; the manager
//! launches it with a persistent profile when nothing listens on the port.

pub mod cdp;
pub mod manager;
pub mod page;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use manager::{BrowserError, BrowserManager, BrowserManagerConfig};
pub use page::CdpPage;

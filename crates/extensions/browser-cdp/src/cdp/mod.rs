//! Chrome DevTools Protocol (CDP) client.
//!
//! Connects to Chrome over WebSocket and speaks the CDP JSON-RPC protocol.
//! One [`CdpClient`] multiplexes every attached [`PageSession`] over a single
//! browser connection (flattened sessions).
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222").await?;
//! let target = client.create_target("https://www.linkedin.com/feed/", false).await?;
//! let session = client.attach(&target).await?;
//! let href = session.evaluate("window.location.href").await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;

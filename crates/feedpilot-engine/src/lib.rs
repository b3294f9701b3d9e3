//! # feedpilot engine
//!
//! Drives multi-step UI interactions on a [`Page`](feedpilot_protocols::Page):
//!
//! - [`is_visible`] decides whether an element can be interacted with
//! - [`ElementWaiter`] waits for a visible element, re-checking on DOM mutations
//! - [`Pacer`] sleeps for randomized intervals between actions
//! - [`Locator`] finds one element through an ordered list of strategies
//! - [`UnfollowFlow`] and [`AcceptFlow`] are the two concrete flows

pub mod flows;
pub mod locator;
pub mod pacer;
pub mod session;
pub mod visibility;
pub mod waiter;

#[cfg(test)]
mod test_page;

pub use flows::{AcceptFlow, FlowSettings, UnfollowFlow, UnfollowState};
pub use locator::{Found, Locator, Predicate, Strategy};
pub use pacer::Pacer;
pub use session::{FlowSession, ProcessingGuard};
pub use visibility::is_visible;
pub use waiter::ElementWaiter;

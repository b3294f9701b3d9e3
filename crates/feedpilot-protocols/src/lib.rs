//! # feedpilot protocols
//!
//! Shared definitions for the feedpilot workspace. Contains only types and
//! interface traits; implementations live in the engine, runtime and
//! extension crates.
//!
//! ## Core Traits
//!
//! - [`Page`] - DOM access for one browser tab
//! - [`TabHost`] - tab lifecycle operations owned by the background context
//! - [`Background`] - request channel from a tab context to the background

pub mod background;
pub mod error;
pub mod message;
pub mod outcome;
pub mod page;
pub mod tab;

pub use background::Background;
pub use error::{FlowError, MessengerError, PageError};
pub use message::{Ack, Request, Response, TabCreated};
pub use outcome::{AcceptReport, BatchReport, CardError, FlowOutcome, TabOutcome};
pub use page::{
    Decoration, ElementRef, ElementSnapshot, MutationSubscription, Page, ReadyState, Rect,
};
pub use tab::{TabHost, TabId, TabInfo};

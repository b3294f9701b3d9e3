//! Error types shared across the feedpilot contexts.

mod flow;
mod messenger;
mod page;

pub use flow::*;
pub use messenger::*;
pub use page::*;

//! Feed post classification for feedpilot.
//!
//! Posts are sent to an OpenAI-compatible chat endpoint and sorted into
//! [`Category`] values. Cringe posts are masked and counted, AI job posts are
//! highlighted and recorded. Every failure degrades to [`Category::General`].

mod api;
mod category;
mod client;
mod debounce;
mod error;
mod extract;
mod prompt;
mod relay;
mod watcher;

#[cfg(test)]
mod test_page;

pub use category::{Category, time_saved_seconds};
pub use client::ChatClient;
pub use debounce::Debouncer;
pub use error::ClassifierError;
pub use extract::ContactExtractor;
pub use relay::{Classification, ClassificationRelay};
pub use watcher::{FeedWatcher, WatchStats};

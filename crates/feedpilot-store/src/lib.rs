//! # feedpilot store
//!
//! Persisted state: the classifier credential and enable flag, running
//! statistics, and the time-pruned list of job posts.

pub mod error;
pub mod export;
pub mod record;
pub mod store;

pub use error::StoreError;
pub use export::{JobExport, export_job_posts};
pub use record::{JobPostRecord, JOB_POST_RETENTION_HOURS, Settings, Stats};
pub use store::{FileStore, MemoryStore, SettingsStore};

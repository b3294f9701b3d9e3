//! Persisted record types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Job posts older than this are dropped by a prune pass.
pub const JOB_POST_RETENTION_HOURS: i64 = 24;

/// Classifier credential and enable flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Off until the user turns classification on.
    #[serde(default)]
    pub enabled: bool,
}

/// Running cringe statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default)]
    pub cringe_count: u64,
    #[serde(default)]
    pub time_saved_minutes: f64,
}

impl Stats {
    /// Count one masked post that saved `seconds` of reading.
    pub fn record(&mut self, seconds: u64) {
        self.cringe_count += 1;
        self.time_saved_minutes += seconds as f64 / 60.0;
    }

    /// Whole minutes saved, rounded up.
    pub fn minutes_display(&self) -> u64 {
        self.time_saved_minutes.ceil() as u64
    }
}

/// A post classified as an AI job listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPostRecord {
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Raw label text returned by the model.
    pub model_output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

impl JobPostRecord {
    /// Whether the record is still inside the retention window at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.timestamp) < Duration::hours(JOB_POST_RETENTION_HOURS)
    }
}

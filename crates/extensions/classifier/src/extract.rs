//! Contact details pulled out of job posts.

use chrono::{DateTime, Utc};
use feedpilot_store::JobPostRecord;
use regex::Regex;

use crate::error::ClassifierError;

const EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";
const PHONE_PATTERN: &str = r"(\+\d{1,3}[ -]?)?\(?\d{3}\)?[ -]?\d{3}[ -]?\d{4}";
const LINK_PATTERN: &str = r"https?://\S+";

/// Builds [`JobPostRecord`]s: first email, first phone number, every link.
#[derive(Debug, Clone)]
pub struct ContactExtractor {
    email: Regex,
    phone: Regex,
    link: Regex,
}

impl ContactExtractor {
    pub fn new() -> Result<Self, ClassifierError> {
        Ok(Self {
            email: Regex::new(EMAIL_PATTERN)?,
            phone: Regex::new(PHONE_PATTERN)?,
            link: Regex::new(LINK_PATTERN)?,
        })
    }

    pub fn record(&self, content: &str, model_output: &str, now: DateTime<Utc>) -> JobPostRecord {
        JobPostRecord {
            content: content.to_string(),
            timestamp: now,
            model_output: model_output.to_string(),
            email: self.email.find(content).map(|m| m.as_str().to_string()),
            phone: self.phone.find(content).map(|m| m.as_str().to_string()),
            links: self
                .link
                .find_iter(content)
                .map(|m| m.as_str().to_string())
                .collect(),
        }
    }
}

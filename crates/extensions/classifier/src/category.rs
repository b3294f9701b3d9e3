//! Post categories and the reading time a masked post saves.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Cringe,
    AiJob,
    General,
}

impl Category {
    /// Map a model answer to a category. Cringe wins over job when the
    /// answer mentions both.
    pub fn from_model_output(output: &str) -> Self {
        let output = output.to_lowercase();
        if output.contains("cringe_post") {
            Category::Cringe
        } else if output.contains("ai_job_post") {
            Category::AiJob
        } else {
            Category::General
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Cringe => "CRINGE_POST",
            Category::AiJob => "AI_JOB_POST",
            Category::General => "GENERAL_POST",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Estimated seconds of reading saved by hiding a post.
pub fn time_saved_seconds(post_text: &str) -> u64 {
    match post_text.split_whitespace().count() {
        0..=20 => 5,
        21..=50 => 10,
        _ => 20,
    }
}

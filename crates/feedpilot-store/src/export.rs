//! Job post export.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use crate::error::StoreError;
use crate::record::JobPostRecord;
use crate::store::SettingsStore;

/// Contents of an exported `ai_jobs_<date>.json` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobExport {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub posts: Vec<JobPostRecord>,
}

/// Write every stored job post to `out_dir/ai_jobs_<date>.json` and clear
/// the stored list. Returns the written path and the number of posts.
pub async fn export_job_posts(
    store: &dyn SettingsStore,
    out_dir: &Path,
    now: DateTime<Utc>,
) -> Result<(PathBuf, usize), StoreError> {
    let date = now.format("%Y-%m-%d").to_string();
    let posts = store.job_posts().await?;
    let count = posts.len();

    fs::create_dir_all(out_dir).await?;
    let path = out_dir.join(format!("ai_jobs_{}.json", date));
    let export = JobExport { date, posts };
    fs::write(&path, serde_json::to_string_pretty(&export)?).await?;

    // Only clear once the file is on disk.
    store.take_job_posts().await?;
    info!("Exported {} job posts to {:?}", count, path);

    Ok((path, count))
}

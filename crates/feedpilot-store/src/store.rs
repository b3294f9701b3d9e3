//! Settings and job-post storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreError;
use crate::record::{JobPostRecord, Settings, Stats};

/// Persisted feedpilot state.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn settings(&self) -> Result<Settings, StoreError>;

    /// Store or clear the classifier credential.
    async fn set_api_key(&self, key: Option<String>) -> Result<(), StoreError>;

    async fn set_enabled(&self, enabled: bool) -> Result<(), StoreError>;

    async fn stats(&self) -> Result<Stats, StoreError>;

    /// Count one masked post. Returns the updated statistics.
    async fn record_cringe(&self, seconds_saved: u64) -> Result<Stats, StoreError>;

    async fn append_job_post(&self, record: JobPostRecord) -> Result<(), StoreError>;

    async fn job_posts(&self) -> Result<Vec<JobPostRecord>, StoreError>;

    /// Drop records outside the retention window at `now`. Returns how many
    /// were removed.
    async fn prune_job_posts(&self, now: DateTime<Utc>) -> Result<usize, StoreError>;

    /// Remove and return every stored record.
    async fn take_job_posts(&self) -> Result<Vec<JobPostRecord>, StoreError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    stats: Stats,
}

fn prune(records: &mut Vec<JobPostRecord>, now: DateTime<Utc>) -> usize {
    let before = records.len();
    records.retain(|r| r.is_fresh(now));
    before - records.len()
}

/// In-memory store for tests and dry runs.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<(SettingsFile, Vec<JobPostRecord>)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts enabled with `key`.
    pub fn with_key(key: impl Into<String>) -> Self {
        let file = SettingsFile {
            settings: Settings {
                api_key: Some(key.into()),
                enabled: true,
            },
            stats: Stats::default(),
        };
        Self {
            state: Mutex::new((file, Vec::new())),
        }
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn settings(&self) -> Result<Settings, StoreError> {
        Ok(self.state.lock().await.0.settings.clone())
    }

    async fn set_api_key(&self, key: Option<String>) -> Result<(), StoreError> {
        self.state.lock().await.0.settings.api_key = key;
        Ok(())
    }

    async fn set_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        self.state.lock().await.0.settings.enabled = enabled;
        Ok(())
    }

    async fn stats(&self) -> Result<Stats, StoreError> {
        Ok(self.state.lock().await.0.stats)
    }

    async fn record_cringe(&self, seconds_saved: u64) -> Result<Stats, StoreError> {
        let mut state = self.state.lock().await;
        state.0.stats.record(seconds_saved);
        Ok(state.0.stats)
    }

    async fn append_job_post(&self, record: JobPostRecord) -> Result<(), StoreError> {
        self.state.lock().await.1.push(record);
        Ok(())
    }

    async fn job_posts(&self) -> Result<Vec<JobPostRecord>, StoreError> {
        Ok(self.state.lock().await.1.clone())
    }

    async fn prune_job_posts(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        Ok(prune(&mut self.state.lock().await.1, now))
    }

    async fn take_job_posts(&self) -> Result<Vec<JobPostRecord>, StoreError> {
        Ok(std::mem::take(&mut self.state.lock().await.1))
    }
}

/// JSON file store.
///
/// ```text
/// {data_dir}/
/// ├── settings.json    credential, enable flag, statistics
/// └── job_posts.json   AI job post records
/// ```
///
/// Every operation re-reads the file so concurrent CLI invocations see each
/// other's writes. Writes go through a temporary file and a rename.
pub struct FileStore {
    data_dir: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub async fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).await?;
        debug!("FileStore initialized at {:?}", data_dir);
        Ok(Self {
            data_dir,
            lock: Mutex::new(()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn settings_path(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }

    fn job_posts_path(&self) -> PathBuf {
        self.data_dir.join("job_posts.json")
    }

    async fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
        match fs::read_to_string(path).await {
            Ok(content) if content.trim().is_empty() => Ok(T::default()),
            // Unparsable files are errors; defaulting would let the next update overwrite them.
            Ok(content) => serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn update_settings<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut SettingsFile) -> R + Send,
        R: Send,
    {
        let _guard = self.lock.lock().await;
        let path = self.settings_path();
        let mut file: SettingsFile = Self::read_json(&path).await?;
        let result = f(&mut file);
        Self::write_json(&path, &file).await?;
        Ok(result)
    }

    async fn update_job_posts<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Vec<JobPostRecord>) -> R + Send,
        R: Send,
    {
        let _guard = self.lock.lock().await;
        let path = self.job_posts_path();
        let mut records: Vec<JobPostRecord> = Self::read_json(&path).await?;
        let result = f(&mut records);
        Self::write_json(&path, &records).await?;
        Ok(result)
    }
}

#[async_trait]
impl SettingsStore for FileStore {
    async fn settings(&self) -> Result<Settings, StoreError> {
        let file: SettingsFile = Self::read_json(&self.settings_path()).await?;
        Ok(file.settings)
    }

    async fn set_api_key(&self, key: Option<String>) -> Result<(), StoreError> {
        self.update_settings(|file| file.settings.api_key = key).await
    }

    async fn set_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        self.update_settings(|file| file.settings.enabled = enabled)
            .await
    }

    async fn stats(&self) -> Result<Stats, StoreError> {
        let file: SettingsFile = Self::read_json(&self.settings_path()).await?;
        Ok(file.stats)
    }

    async fn record_cringe(&self, seconds_saved: u64) -> Result<Stats, StoreError> {
        self.update_settings(|file| {
            file.stats.record(seconds_saved);
            file.stats
        })
        .await
    }

    async fn append_job_post(&self, record: JobPostRecord) -> Result<(), StoreError> {
        self.update_job_posts(|records| records.push(record)).await
    }

    async fn job_posts(&self) -> Result<Vec<JobPostRecord>, StoreError> {
        Self::read_json(&self.job_posts_path()).await
    }

    async fn prune_job_posts(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let removed = self.update_job_posts(|records| prune(records, now)).await?;
        if removed > 0 {
            debug!("Pruned {} expired job posts", removed);
        }
        Ok(removed)
    }

    async fn take_job_posts(&self) -> Result<Vec<JobPostRecord>, StoreError> {
        self.update_job_posts(std::mem::take).await
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

//! Classification Relay: post text in, category and page side effects out.

use std::sync::Arc;

use chrono::Utc;
use feedpilot_config::ClassifierConfig;
use feedpilot_protocols::{Decoration, ElementRef, Page};
use feedpilot_store::SettingsStore;
use tracing::{debug, info, warn};

use crate::category::{Category, time_saved_seconds};
use crate::client::ChatClient;
use crate::error::ClassifierError;
use crate::extract::ContactExtractor;

/// A category and the model answer behind it. `model_output` is absent when
/// no call was made or the call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub model_output: Option<String>,
}

impl Classification {
    fn general() -> Self {
        Self {
            category: Category::General,
            model_output: None,
        }
    }
}

pub struct ClassificationRelay {
    client: ChatClient,
    store: Arc<dyn SettingsStore>,
    /// Used when the store holds no key.
    fallback_key: Option<String>,
    extractor: ContactExtractor,
}

impl ClassificationRelay {
    pub fn new(
        config: &ClassifierConfig,
        store: Arc<dyn SettingsStore>,
    ) -> Result<Self, ClassifierError> {
        Ok(Self {
            client: ChatClient::new(config)?,
            store,
            fallback_key: config.api_key.clone(),
            extractor: ContactExtractor::new()?,
        })
    }

    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    /// The API key to classify with, or `None` when classification is off.
    pub async fn credential(&self) -> Option<String> {
        let settings = match self.store.settings().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to read settings: {}", e);
                return None;
            }
        };
        if !settings.enabled {
            return None;
        }
        settings
            .api_key
            .or_else(|| self.fallback_key.clone())
            .filter(|key| !key.trim().is_empty())
    }

    /// Classify post text. Never fails: anything that goes wrong is
    /// [`Category::General`].
    pub async fn classify(&self, post_text: &str) -> Classification {
        let Some(api_key) = self.credential().await else {
            debug!("Classification disabled or no API key");
            return Classification::general();
        };

        match self.client.complete(&api_key, post_text).await {
            Ok(output) => {
                let output = output.to_lowercase();
                Classification {
                    category: Category::from_model_output(&output),
                    model_output: Some(output),
                }
            }
            Err(e) => {
                warn!("Classification failed, treating post as general: {}", e);
                Classification::general()
            }
        }
    }

    /// Apply the page and store side effects of a classification.
    pub async fn apply(
        &self,
        page: &dyn Page,
        post: &ElementRef,
        post_text: &str,
        classification: &Classification,
    ) -> Result<(), ClassifierError> {
        match classification.category {
            Category::Cringe => {
                page.decorate(post, Decoration::Mask).await?;
                let stats = self
                    .store
                    .record_cringe(time_saved_seconds(post_text))
                    .await?;
                info!(
                    "Masked cringe post #{} ({} min saved)",
                    stats.cringe_count,
                    stats.minutes_display()
                );
            }
            Category::AiJob => {
                page.decorate(post, Decoration::Highlight).await?;
                let output = classification.model_output.as_deref().unwrap_or_default();
                let record = self.extractor.record(post_text, output, Utc::now());
                self.store.append_job_post(record).await?;
                info!("Recorded AI job post");
            }
            Category::General => {}
        }
        Ok(())
    }

    /// Read, classify and annotate one post.
    pub async fn process(&self, page: &dyn Page, post: &ElementRef) -> Result<Category, ClassifierError> {
        let text = page.inspect(post).await?.text;
        let classification = self.classify(&text).await;
        self.apply(page, post, &text, &classification).await?;
        Ok(classification.category)
    }

    /// Drop job posts past the retention window.
    pub async fn prune(&self) -> Result<usize, ClassifierError> {
        let removed = self.store.prune_job_posts(Utc::now()).await?;
        if removed > 0 {
            info!("Pruned {} expired job posts", removed);
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "relay_tests.rs"]
mod tests;

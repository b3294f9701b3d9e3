//! Feed watcher: classifies every post once, as it appears.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use feedpilot_config::ClassifierConfig;
use feedpilot_protocols::{ElementRef, Page, PageError};
use parking_lot::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::category::Category;
use crate::debounce::Debouncer;
use crate::relay::ClassificationRelay;

/// Counts from one watch session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchStats {
    pub classified: usize,
    pub cringe: usize,
    pub ai_jobs: usize,
    pub failed: usize,
}

impl WatchStats {
    fn record(&mut self, category: Category) {
        self.classified += 1;
        match category {
            Category::Cringe => self.cringe += 1,
            Category::AiJob => self.ai_jobs += 1,
            Category::General => {}
        }
    }
}

pub struct FeedWatcher {
    page: Arc<dyn Page>,
    relay: Arc<ClassificationRelay>,
    debouncer: Arc<Debouncer<ElementRef>>,
    post_selector: String,
    classified: Arc<Mutex<HashSet<ElementRef>>>,
    stats: Arc<Mutex<WatchStats>>,
    tasks: Mutex<JoinSet<()>>,
}

impl FeedWatcher {
    pub fn new(
        page: Arc<dyn Page>,
        relay: Arc<ClassificationRelay>,
        config: &ClassifierConfig,
    ) -> Self {
        Self {
            page,
            relay,
            debouncer: Arc::new(Debouncer::new(Duration::from_millis(config.debounce_ms))),
            post_selector: config.post_selector.clone(),
            classified: Arc::new(Mutex::new(HashSet::new())),
            stats: Arc::new(Mutex::new(WatchStats::default())),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    pub fn stats(&self) -> WatchStats {
        *self.stats.lock()
    }

    /// Watch the page until its mutation stream ends.
    ///
    /// Does nothing when classification is disabled or has no key. Otherwise
    /// prunes expired job posts, classifies the posts already present, then
    /// every post that shows up later. Returns once in-flight
    /// classifications have finished.
    pub async fn run(&self) -> Result<WatchStats, PageError> {
        if self.relay.credential().await.is_none() {
            warn!("Classification is disabled or no API key is set; not watching");
            return Ok(self.stats());
        }

        if let Err(e) = self.relay.prune().await {
            warn!("Failed to prune job posts: {}", e);
        }

        let mut mutations = self.page.mutations();
        self.scan().await?;
        while mutations.changed().await {
            self.scan().await?;
        }

        let mut tasks = std::mem::take(&mut *self.tasks.lock());
        while tasks.join_next().await.is_some() {}

        let stats = self.stats();
        info!(
            "Feed watch ended: {} classified, {} cringe, {} AI jobs",
            stats.classified, stats.cringe, stats.ai_jobs
        );
        Ok(stats)
    }

    /// Note every post on the page. Each sighting of a post not yet
    /// classified restarts its debounce period.
    async fn scan(&self) -> Result<(), PageError> {
        let posts = self.page.query_all(&self.post_selector).await?;
        let mut tasks = self.tasks.lock();
        // Superseded debounce waits finish quickly; reap them.
        while tasks.try_join_next().is_some() {}
        for post in posts {
            if self.classified.lock().contains(&post) {
                continue;
            }
            tasks.spawn(classify_post(
                post,
                Arc::clone(&self.page),
                Arc::clone(&self.relay),
                Arc::clone(&self.debouncer),
                Arc::clone(&self.classified),
                Arc::clone(&self.stats),
            ));
        }
        Ok(())
    }
}

async fn classify_post(
    post: ElementRef,
    page: Arc<dyn Page>,
    relay: Arc<ClassificationRelay>,
    debouncer: Arc<Debouncer<ElementRef>>,
    classified: Arc<Mutex<HashSet<ElementRef>>>,
    stats: Arc<Mutex<WatchStats>>,
) {
    if !debouncer.settle(post.clone()).await {
        return;
    }
    if !classified.lock().insert(post.clone()) {
        return;
    }

    match relay.process(page.as_ref(), &post).await {
        Ok(category) => {
            debug!("Post {} classified as {}", post, category);
            stats.lock().record(category);
        }
        Err(e) => {
            warn!("Failed to process post {}: {}", post, e);
            stats.lock().failed += 1;
        }
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;

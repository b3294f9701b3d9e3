//! Subcommands that drive the browser.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use feedpilot_browser_cdp::{BrowserManager, BrowserManagerConfig, CdpPage};
use feedpilot_classifier::{ClassificationRelay, FeedWatcher};
use feedpilot_config::Config;
use feedpilot_protocols::{TabHost, TabId};
use feedpilot_runtime::{AgentSettings, BackgroundService, BatchCoordinator, TabAgent};
use feedpilot_store::FileStore;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

fn connect(config: &Config) -> Arc<BrowserManager> {
    Arc::new(BrowserManager::new(BrowserManagerConfig::from(&config.browser)))
}

/// Find a tab whose URL contains `marker`, or open `url`.
async fn find_or_open(
    manager: &BrowserManager,
    marker: &str,
    url: &str,
    settle: Duration,
) -> Result<(TabId, Arc<CdpPage>), Box<dyn std::error::Error>> {
    if let Some(tab) = manager.tabs_matching(marker).await?.into_iter().next() {
        info!("Using open tab {} ({})", tab.id, tab.url);
        let page = manager.page(&tab.id).await?;
        return Ok((tab.id, page));
    }

    info!("Opening {}", url);
    let opened = manager.open(url).await?;
    tokio::time::sleep(settle).await;
    Ok(opened)
}

/// Run the unfollow flow on every profile tab.
pub(crate) async fn unfollow(config: &Config, urls: Vec<String>) -> CmdResult {
    let manager = connect(config);

    let tabs: Vec<TabId> = if urls.is_empty() {
        manager
            .tabs_matching(&config.flows.profile_url_marker)
            .await?
            .into_iter()
            .map(|tab| tab.id)
            .collect()
    } else {
        let mut opened = Vec::with_capacity(urls.len());
        for url in &urls {
            let (tab, _) = manager.open(url).await?;
            opened.push(tab);
        }
        tokio::time::sleep(Duration::from_millis(config.batch.open_settle_ms)).await;
        opened
    };

    if tabs.is_empty() {
        println!("No profile tabs open");
        return Ok(());
    }

    let host: Arc<dyn TabHost> = manager.clone();
    let (background, service) = BackgroundService::spawn(host);
    let settings = AgentSettings::from_config(config);

    let mut clients = Vec::with_capacity(tabs.len());
    for tab in tabs {
        let page = match manager.page(&tab).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Skipping tab {}: {}", tab, e);
                continue;
            }
        };
        let (client, _) = TabAgent::new(tab, page, &background, settings.clone()).spawn();
        clients.push(client);
    }

    let report = BatchCoordinator::new(&config.batch)
        .run_unfollow(&clients)
        .await;

    for tab in &report.outcomes {
        let mark = if tab.outcome.success { "ok  " } else { "fail" };
        println!("{} {}  {}", mark, tab.tab_id, tab.outcome.message);
    }
    let (successful, total) = report.summary();
    println!("Unfollowed {}/{} profiles", successful, total);

    drop(clients);
    drop(background);
    let _ = service.await;
    manager.close().await?;
    Ok(())
}

/// Accept up to `count` invitations on the invitation manager page.
pub(crate) async fn accept(config: &Config, count: usize) -> CmdResult {
    let manager = connect(config);
    let (tab, page) = find_or_open(
        &manager,
        &config.flows.invitation_url_marker,
        &config.flows.invitation_url,
        Duration::from_millis(config.batch.open_settle_ms),
    )
    .await?;

    let host: Arc<dyn TabHost> = manager.clone();
    let (background, service) = BackgroundService::spawn(host);
    let (client, _) = TabAgent::new(tab, page, &background, AgentSettings::from_config(config)).spawn();

    let report = client.accept_requests(count).await?;
    if let Some(error) = &report.error {
        println!("Failed: {}", error);
    } else if let Some(message) = &report.message {
        println!("{}", message);
    } else {
        println!("Accepted {}/{} invitations", report.processed, report.total);
    }
    for error in &report.errors {
        println!("  card {}: {}", error.index, error.message);
    }

    drop(client);
    drop(background);
    let _ = service.await;
    manager.close().await?;
    Ok(())
}

/// Classify feed posts until the page goes away or Ctrl-C.
pub(crate) async fn watch(config: &Config, url: Option<String>) -> CmdResult {
    let store = Arc::new(FileStore::new(config.storage.resolved_data_dir()).await?);
    let relay = Arc::new(ClassificationRelay::new(&config.classifier, store)?);
    if relay.credential().await.is_none() {
        println!("Classification is disabled or has no API key; see `feedpilot settings`");
        return Ok(());
    }

    let manager = connect(config);
    let settle = Duration::from_millis(config.batch.open_settle_ms);
    let (tab, page) = match url {
        Some(url) => {
            let opened = manager.open(&url).await?;
            tokio::time::sleep(settle).await;
            opened
        }
        None => {
            let feed_url = config.classifier.feed_url.as_str();
            find_or_open(&manager, feed_url, feed_url, settle).await?
        }
    };
    info!("Watching feed in tab {}", tab);

    let watcher = FeedWatcher::new(page, relay, &config.classifier);
    let stats = tokio::select! {
        result = watcher.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            watcher.stats()
        }
    };

    println!(
        "Classified {} posts: {} cringe, {} AI jobs, {} failed",
        stats.classified, stats.cringe, stats.ai_jobs, stats.failed
    );
    manager.close().await?;
    Ok(())
}

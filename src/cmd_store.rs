//! Subcommands that only touch local storage.

use std::path::PathBuf;

use chrono::Utc;

use feedpilot_config::Config;
use feedpilot_store::{FileStore, SettingsStore, export_job_posts};

use crate::cli::{JobsAction, SettingsAction};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

async fn open_store(config: &Config) -> Result<FileStore, Box<dyn std::error::Error>> {
    Ok(FileStore::new(config.storage.resolved_data_dir()).await?)
}

/// Handle jobs subcommands.
pub(crate) async fn handle_jobs_command(config: &Config, action: JobsAction) -> CmdResult {
    let store = open_store(config).await?;
    match action {
        JobsAction::List { format } => jobs_list(&store, &format).await,
        JobsAction::Export { out } => {
            let out = out.unwrap_or_else(|| PathBuf::from("."));
            let (path, count) = export_job_posts(&store, &out, Utc::now()).await?;
            println!("Exported {} job posts to {}", count, path.display());
            Ok(())
        }
        JobsAction::Prune => {
            let removed = store.prune_job_posts(Utc::now()).await?;
            println!("Removed {} expired job posts", removed);
            Ok(())
        }
    }
}

async fn jobs_list(store: &FileStore, format: &str) -> CmdResult {
    let posts = store.job_posts().await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    if posts.is_empty() {
        println!("No job posts recorded");
        return Ok(());
    }

    for post in &posts {
        println!("{}", post.timestamp.format("%Y-%m-%d %H:%M"));
        println!("  {}", preview(&post.content, 100));
        if let Some(email) = &post.email {
            println!("  email: {}", email);
        }
        if let Some(phone) = &post.phone {
            println!("  phone: {}", phone);
        }
        for link in &post.links {
            println!("  link:  {}", link);
        }
    }
    println!("\n{} job posts", posts.len());
    Ok(())
}

/// First `max` characters of `text` on one line.
fn preview(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        flat
    } else {
        format!("{}...", flat.chars().take(max).collect::<String>())
    }
}

/// Handle settings subcommands.
pub(crate) async fn handle_settings_command(config: &Config, action: SettingsAction) -> CmdResult {
    let store = open_store(config).await?;
    match action {
        SettingsAction::Show => {
            let settings = store.settings().await?;
            let stats = store.stats().await?;
            let key = match settings.api_key.as_deref() {
                Some(key) => mask_key(key),
                None if config.classifier.api_key.is_some() => "(from config)".to_string(),
                None => "(not set)".to_string(),
            };
            println!("enabled:     {}", settings.enabled);
            println!("api key:     {}", key);
            println!("cringe:      {}", stats.cringe_count);
            println!("time saved:  {} min", stats.minutes_display());
        }
        SettingsAction::SetKey { key } => {
            store.set_api_key(Some(key)).await?;
            println!("API key saved");
        }
        SettingsAction::Enable => {
            store.set_enabled(true).await?;
            println!("Classification enabled");
        }
        SettingsAction::Disable => {
            store.set_enabled(false).await?;
            println!("Classification disabled");
        }
    }
    Ok(())
}

fn mask_key(key: &str) -> String {
    let visible: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("****{}", visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_flattens_and_truncates() {
        assert_eq!(preview("Hiring\n\n  ML   engineers", 100), "Hiring ML engineers");
        assert_eq!(preview("abcdef", 3), "abc...");
    }

    #[test]
    fn test_mask_key_keeps_last_four() {
        assert_eq!(mask_key("gsk_123456789"), "****6789");
        assert_eq!(mask_key("ab"), "****ab");
    }
}

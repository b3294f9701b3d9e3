//! feedpilot: bulk unfollow, invitation acceptance and feed classification
//! for a Chrome session driven over the DevTools Protocol.

mod cli;
mod cmd_browser;
mod cmd_store;

use std::sync::OnceLock;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use feedpilot_config::{ConfigLoader, ConfigValidator, feedpilot_home};

use crate::cli::{Cli, Commands};

static GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.feedpilot/logs/ with daily rotation.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = feedpilot_home().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("feedpilot")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    // The writer flushes until the guard drops.
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = ConfigLoader::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Unfollow { urls } => cmd_browser::unfollow(&config, urls).await,
        Commands::Accept { count } => {
            let count = count.unwrap_or(config.flows.default_accept_count);
            cmd_browser::accept(&config, count).await
        }
        Commands::Watch { url } => cmd_browser::watch(&config, url).await,
        Commands::Jobs { action } => cmd_store::handle_jobs_command(&config, action).await,
        Commands::Settings { action } => {
            cmd_store::handle_settings_command(&config, action).await
        }
        Commands::CheckConfig { print } => check_config(&config, print),
    }
}

/// Validate the loaded configuration and print the findings.
fn check_config(
    config: &feedpilot_config::Config,
    print: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if print {
        println!("{}", config.to_toml()?);
    }

    let result = ConfigValidator::validate(config)?;

    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }

    if result.is_valid() {
        println!("Configuration OK");
        Ok(())
    } else {
        Err(format!("{} configuration error(s)", result.errors.len()).into())
    }
}

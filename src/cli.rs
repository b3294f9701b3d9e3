//! CLI definitions for feedpilot.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// feedpilot CLI.
#[derive(Parser)]
#[command(name = "feedpilot")]
#[command(about = "Feed classification and profile automation over the Chrome DevTools Protocol")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.feedpilot/config.toml)
    #[arg(short, long, global = true, env = "FEEDPILOT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Unfollow every open profile tab, or the given profile URLs
    Unfollow {
        /// Profile URLs to open first
        urls: Vec<String>,
    },

    /// Accept pending invitations
    Accept {
        /// Maximum number of invitations to accept
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Classify the feed and annotate posts until Ctrl-C
    Watch {
        /// Feed URL to open when no feed tab is open
        #[arg(long)]
        url: Option<String>,
    },

    /// Recorded AI job posts
    Jobs {
        #[command(subcommand)]
        action: JobsAction,
    },

    /// Classifier settings and statistics
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Validate the configuration file
    CheckConfig {
        /// Also print the effective configuration
        #[arg(long)]
        print: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum JobsAction {
    /// List stored job posts
    List {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Write job posts to ai_jobs_<date>.json and clear them
    Export {
        /// Output directory (default: current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Drop job posts older than 24 hours
    Prune,
}

#[derive(Subcommand)]
pub(crate) enum SettingsAction {
    /// Show settings and statistics
    Show,

    /// Store the classification API key
    SetKey {
        /// API key
        key: String,
    },

    /// Turn classification on
    Enable,

    /// Turn classification off
    Disable,
}

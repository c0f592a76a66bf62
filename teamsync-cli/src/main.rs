//! teamsync — membership sync and version-watch CLI.
//!
//! # Usage
//!
//! ```text
//! teamsync sync [--teams QA IT] [--create-roles] [--dry-run]
//! teamsync watch <target>... [--dry-run]
//! teamsync watch --url <page> --pattern <regex>
//! teamsync watch --list
//! ```
//!
//! Configuration precedence: CLI flag > `TEAMSYNC_*` environment variable >
//! `~/.teamsync/config.yaml` > built-in default.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{sync::SyncArgs, watch::WatchArgs};

#[derive(Parser, Debug)]
#[command(
    name = "teamsync",
    version,
    about = "Sync directory team memberships into role mappings, watch vendor release pages",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// One-way sync of team memberships into the role store.
    Sync(SyncArgs),

    /// Poll vendor pages for new versions and notify on change.
    Watch(WatchArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Watch(args) => args.run(),
    }
}

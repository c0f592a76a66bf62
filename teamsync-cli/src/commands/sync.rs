//! `teamsync sync` — one membership sync pass.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use teamsync_core::config::{Overrides, SyncConfig};
use teamsync_directory::DirectoryClient;
use teamsync_pipeline::{
    append_conflict_log, render_conflicts, RoleOutcome, SyncOptions, SyncOutcome,
};
use teamsync_rolestore::{default_role_template, RoleStoreClient};

/// Arguments for `teamsync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Specific teams to sync, matched exactly against short names (default: all).
    #[arg(long = "teams", num_args = 1..)]
    pub teams: Vec<String>,

    /// Create roles that don't exist in the store.
    #[arg(long = "create-roles")]
    pub create_roles: bool,

    /// Show what would be synced without making changes.
    #[arg(long)]
    pub dry_run: bool,

    /// Push mappings with enabled=false.
    #[arg(long)]
    pub disabled: bool,

    /// JSON permission template for created roles; `{role}` is substituted.
    #[arg(long)]
    pub role_template: Option<PathBuf>,

    /// Config file path (default: ~/.teamsync/config.yaml).
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub directory_url: Option<String>,
    #[arg(long)]
    pub directory_user: Option<String>,
    #[arg(long)]
    pub directory_password: Option<String>,
    #[arg(long)]
    pub rolestore_url: Option<String>,
    #[arg(long)]
    pub rolestore_user: Option<String>,
    #[arg(long)]
    pub rolestore_password: Option<String>,

    /// Append-only conflict report location.
    #[arg(long)]
    pub conflict_log: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let overrides = Overrides {
            config_file: self.config.clone(),
            directory_url: self.directory_url.clone(),
            directory_user: self.directory_user.clone(),
            directory_password: self.directory_password.clone(),
            rolestore_url: self.rolestore_url.clone(),
            rolestore_user: self.rolestore_user.clone(),
            rolestore_password: self.rolestore_password.clone(),
            conflict_log: self.conflict_log.clone(),
            request_timeout_secs: self.timeout_secs,
            ..Overrides::default()
        };
        let config = SyncConfig::resolve(&overrides).context("failed to resolve configuration")?;

        let role_template = match &self.role_template {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read role template {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("role template {} is not valid JSON", path.display()))?
            }
            None => default_role_template(),
        };

        let options = SyncOptions {
            team_filter: if self.teams.is_empty() {
                None
            } else {
                Some(self.teams.iter().cloned().collect::<BTreeSet<_>>())
            },
            create_missing_roles: self.create_roles,
            dry_run: self.dry_run,
            enabled: !self.disabled,
            role_template,
        };

        let timeout = Duration::from_secs(config.request_timeout_secs);
        let directory = DirectoryClient::connect(&config.directory, timeout)
            .context("directory authentication failed")?;
        let store = RoleStoreClient::new(&config.rolestore, timeout);

        let outcome = teamsync_pipeline::run(&directory, &store, &options)?;

        if !outcome.conflicts.is_empty() {
            println!(
                "{}",
                format!("{} name conflict(s):", outcome.conflicts.len())
                    .yellow()
                    .bold()
            );
            print!("{}", render_conflicts(&outcome.conflicts));
            append_conflict_log(&config.conflict_log, &outcome.conflicts, Utc::now())?;
        }

        if self.dry_run {
            print_dry_run(&outcome);
        } else {
            print_results(&outcome);
        }

        if outcome.failed() > 0 {
            bail!("{} role(s) failed to sync", outcome.failed());
        }
        Ok(())
    }
}

#[derive(Tabled)]
struct MappingRow {
    #[tabled(rename = "role")]
    role: String,
    #[tabled(rename = "members")]
    members: usize,
    #[tabled(rename = "users")]
    users: String,
}

fn print_dry_run(outcome: &SyncOutcome) {
    println!("{}", "[dry-run] no changes will be made".bold());
    if outcome.memberships.is_empty() {
        println!("Nothing to sync.");
        return;
    }

    let rows: Vec<MappingRow> = outcome
        .memberships
        .iter()
        .map(|(role, users)| MappingRow {
            role: role.to_string(),
            members: users.len(),
            users: users
                .iter()
                .map(|u| u.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn print_results(outcome: &SyncOutcome) {
    for result in &outcome.roles {
        match &result.outcome {
            RoleOutcome::Synced { users, role_created } => {
                let suffix = if *role_created { " (role created)" } else { "" };
                println!("  {}  {} — {users} users{suffix}", "✓".green(), result.name);
            }
            RoleOutcome::SkippedEmpty => {
                println!("  {}  {} — no members, skipped", "·".bright_black(), result.name);
            }
            RoleOutcome::Failed { error } => {
                println!("  {}  {} — {error}", "✗".red(), result.name);
            }
            RoleOutcome::WouldSync { users } => {
                println!("  {}  {} — would sync {users} users", "~".yellow(), result.name);
            }
        }
    }
    println!(
        "{} synced, {} failed, {} conflict(s)",
        outcome.synced(),
        outcome.failed(),
        outcome.conflicts.len()
    );
}

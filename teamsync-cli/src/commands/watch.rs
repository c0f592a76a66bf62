//! `teamsync watch` — poll vendor pages for new versions.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use regex::Regex;
use tabled::{settings::Style, Table, Tabled};

use teamsync_core::config::{Overrides, WatchConfig};
use teamsync_watch::{find_target, run_check, CheckOutcome, CheckSpec, BUILTIN};

/// Arguments for `teamsync watch`.
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Built-in targets to check (see --list).
    #[arg(num_args = 0..)]
    pub targets: Vec<String>,

    /// List built-in targets and exit.
    #[arg(long)]
    pub list: bool,

    /// Ad-hoc page URL to check instead of a built-in target.
    #[arg(long, requires = "pattern", conflicts_with = "targets")]
    pub url: Option<String>,

    /// Version regex for --url; the first capture group is the version.
    #[arg(long, requires = "url")]
    pub pattern: Option<String>,

    /// Detect and report without notifying or recording.
    #[arg(long)]
    pub dry_run: bool,

    /// Version cookie path (single target only; default: ~/.teamsync/versions/<target>.txt).
    #[arg(long)]
    pub version_file: Option<PathBuf>,

    /// Slack incoming webhook for change notifications.
    #[arg(long)]
    pub slack_webhook: Option<String>,

    /// Fetch attempts before giving up.
    #[arg(long, default_value_t = 3)]
    pub attempts: u32,

    /// Delay between fetch attempts, in seconds.
    #[arg(long, default_value_t = 5)]
    pub retry_delay_secs: u64,

    /// Config file path (default: ~/.teamsync/config.yaml).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl WatchArgs {
    pub fn run(self) -> Result<()> {
        if self.list {
            print_targets();
            return Ok(());
        }

        let overrides = Overrides {
            config_file: self.config.clone(),
            slack_webhook: self.slack_webhook.clone(),
            request_timeout_secs: self.timeout_secs,
            ..Overrides::default()
        };
        let config = WatchConfig::resolve(&overrides).context("failed to resolve configuration")?;

        let specs = self.build_specs(&config)?;
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build();

        let mut failures = 0;
        for spec in &specs {
            match run_check(&agent, spec) {
                Ok(outcome) => print_outcome(&spec.name, &outcome),
                Err(e) => {
                    failures += 1;
                    println!("  {}  {} — {e}", "✗".red(), spec.name);
                }
            }
        }

        if failures > 0 {
            bail!("{failures} check(s) failed");
        }
        Ok(())
    }

    fn build_specs(&self, config: &WatchConfig) -> Result<Vec<CheckSpec>> {
        let mut named: Vec<(String, String, String)> = Vec::new();

        if let (Some(url), Some(pattern)) = (&self.url, &self.pattern) {
            named.push(("custom".to_string(), url.clone(), pattern.clone()));
        } else {
            if self.targets.is_empty() {
                bail!("provide a target name, --url with --pattern, or --list");
            }
            for name in &self.targets {
                let target = find_target(name)
                    .with_context(|| format!("unknown target '{name}'; try --list"))?;
                named.push((
                    target.name.to_string(),
                    target.url.to_string(),
                    target.pattern.to_string(),
                ));
            }
        }

        if self.version_file.is_some() && named.len() > 1 {
            bail!("--version-file only applies when checking a single target");
        }

        named
            .into_iter()
            .map(|(name, url, pattern)| {
                let pattern = Regex::new(&pattern)
                    .with_context(|| format!("invalid version pattern for '{name}'"))?;
                let version_file = self
                    .version_file
                    .clone()
                    .unwrap_or_else(|| config.version_dir.join(format!("{name}.txt")));
                Ok(CheckSpec {
                    name,
                    url,
                    pattern,
                    version_file,
                    webhook: config.slack_webhook.clone(),
                    dry_run: self.dry_run,
                    attempts: self.attempts,
                    retry_delay: Duration::from_secs(self.retry_delay_secs),
                })
            })
            .collect()
    }
}

#[derive(Tabled)]
struct TargetRow {
    #[tabled(rename = "target")]
    target: &'static str,
    #[tabled(rename = "page")]
    page: &'static str,
}

fn print_targets() {
    let rows: Vec<TargetRow> = BUILTIN
        .iter()
        .map(|t| TargetRow {
            target: t.name,
            page: t.url,
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn print_outcome(name: &str, outcome: &CheckOutcome) {
    match outcome {
        CheckOutcome::FirstRun { version } => {
            println!("  {}  {name} — first run, recorded {version}", "✓".green());
        }
        CheckOutcome::Unchanged { version } => {
            println!("  {}  {name} — no update, still {version}", "·".bright_black());
        }
        CheckOutcome::Updated { previous, version } => {
            println!(
                "  {}  {name} — {previous} -> {version}, notification sent",
                "!".yellow().bold()
            );
        }
        CheckOutcome::WouldNotify { previous, version } => {
            let from = previous.as_deref().unwrap_or("none");
            println!("  {}  {name} — would record {from} -> {version}", "~".yellow());
        }
    }
}

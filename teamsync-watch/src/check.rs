//! One version check: fetch → extract → compare cookie → notify.

use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;

use crate::cookie;
use crate::error::WatchError;
use crate::notify;
use crate::retry::with_retry;
use crate::version::extract_latest;

/// Everything one check needs, resolved before it starts.
#[derive(Debug)]
pub struct CheckSpec {
    pub name: String,
    pub url: String,
    pub pattern: Regex,
    /// Flat-file version cookie for this target.
    pub version_file: PathBuf,
    pub webhook: Option<String>,
    pub dry_run: bool,
    pub attempts: u32,
    pub retry_delay: Duration,
}

/// What one check concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No cookie yet — record the version, do not notify.
    FirstRun { version: String },
    /// Cookie matches the page.
    Unchanged { version: String },
    /// Changed; notification sent and cookie rewritten.
    Updated { previous: String, version: String },
    /// Dry run: a new version was seen but the notification and cookie
    /// write were suppressed. `previous: None` means it was a first run.
    WouldNotify {
        previous: Option<String>,
        version: String,
    },
}

/// Run one check against the real network.
pub fn run_check(agent: &ureq::Agent, spec: &CheckSpec) -> Result<CheckOutcome, WatchError> {
    run_check_with(spec, || fetch_page(agent, &spec.url), |text| {
        let webhook = spec.webhook.as_deref().ok_or(WatchError::MissingWebhook)?;
        notify::send_slack(agent, webhook, text)
    })
}

/// Check logic with injectable fetch and notify, used directly by tests.
///
/// The cookie is rewritten only after a successful notification, so a failed
/// webhook call leaves the change pending for the next run.
pub fn run_check_with<F, N>(
    spec: &CheckSpec,
    fetch: F,
    mut send: N,
) -> Result<CheckOutcome, WatchError>
where
    F: FnMut() -> Result<String, WatchError>,
    N: FnMut(&str) -> Result<(), WatchError>,
{
    let body = with_retry(spec.attempts, spec.retry_delay, fetch)?;
    let latest = extract_latest(&body, &spec.pattern).ok_or_else(|| WatchError::NoVersionFound {
        url: spec.url.clone(),
    })?;

    let previous = cookie::read_last(&spec.version_file)?;
    match previous {
        None => {
            tracing::info!("{}: first run, recording version {latest}", spec.name);
            if spec.dry_run {
                return Ok(CheckOutcome::WouldNotify {
                    previous: None,
                    version: latest,
                });
            }
            cookie::write_last(&spec.version_file, &latest)?;
            Ok(CheckOutcome::FirstRun { version: latest })
        }
        Some(previous) if previous == latest => {
            tracing::info!("{}: no update, still {latest}", spec.name);
            Ok(CheckOutcome::Unchanged { version: latest })
        }
        Some(previous) => {
            tracing::info!("{}: version changed {previous} -> {latest}", spec.name);
            if spec.dry_run {
                return Ok(CheckOutcome::WouldNotify {
                    previous: Some(previous),
                    version: latest,
                });
            }
            send(&notify::release_message(&spec.name, &latest, &spec.url))?;
            cookie::write_last(&spec.version_file, &latest)?;
            Ok(CheckOutcome::Updated {
                previous,
                version: latest,
            })
        }
    }
}

fn fetch_page(agent: &ureq::Agent, url: &str) -> Result<String, WatchError> {
    let response = agent.get(url).call().map_err(|e| WatchError::Http {
        url: url.to_string(),
        source: Box::new(e),
    })?;
    response.into_string().map_err(|source| WatchError::Body {
        url: url.to_string(),
        source,
    })
}

//! Configuration value objects with layered resolution.
//!
//! # Precedence
//!
//! Every field is resolved once, before a run starts, from four layers:
//!
//! 1. explicit CLI argument ([`Overrides`])
//! 2. environment variable (`TEAMSYNC_*`)
//! 3. config file (`<home>/.teamsync/config.yaml`)
//! 4. hard default
//!
//! Components receive the resolved value object at construction and never
//! read configuration implicitly mid-run.
//!
//! # API pattern
//!
//! Every resolver has two forms:
//! - `resolve_at(overrides, env, home)` — explicit environment lookup and
//!   home; used in tests with `TempDir` and closures
//! - `resolve(overrides)` — reads `std::env` and `dirs::home_dir()`,
//!   delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Lookup for environment variables, injectable for tests.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Resolved value objects
// ---------------------------------------------------------------------------

/// Credentials and base URL for one remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub username: String,
    pub password: String,
}

/// Fully-resolved configuration for a membership sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub directory: Endpoint,
    pub rolestore: Endpoint,
    pub request_timeout_secs: u64,
    /// Append-only conflict report location.
    pub conflict_log: PathBuf,
}

/// Fully-resolved configuration for version-watch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// Directory holding one `<target>.txt` version cookie per target.
    pub version_dir: PathBuf,
    pub slack_webhook: Option<String>,
    pub request_timeout_secs: u64,
}

/// Explicit per-run overrides, normally populated from CLI flags.
///
/// `None` means "fall through to the next layer".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub directory_url: Option<String>,
    pub directory_user: Option<String>,
    pub directory_password: Option<String>,
    pub rolestore_url: Option<String>,
    pub rolestore_user: Option<String>,
    pub rolestore_password: Option<String>,
    pub conflict_log: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
    pub version_dir: Option<PathBuf>,
    pub slack_webhook: Option<String>,
}

// ---------------------------------------------------------------------------
// File layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    directory: FileEndpoint,
    #[serde(default)]
    rolestore: FileEndpoint,
    conflict_log: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
    #[serde(default)]
    watch: FileWatch,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FileEndpoint {
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FileWatch {
    version_dir: Option<PathBuf>,
    slack_webhook: Option<String>,
}

/// `<home>/.teamsync/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".teamsync").join("config.yaml")
}

/// Load the file layer. A missing file is not an error — every field just
/// falls through to defaults.
fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Per-field resolution helpers
// ---------------------------------------------------------------------------

fn pick(
    explicit: Option<String>,
    env_key: &str,
    env: EnvLookup,
    file: Option<String>,
) -> Option<String> {
    explicit.or_else(|| env(env_key)).or(file)
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    value.ok_or(ConfigError::MissingField { field })
}

fn pick_timeout(
    explicit: Option<u64>,
    env: EnvLookup,
    file: Option<u64>,
) -> Result<u64, ConfigError> {
    if let Some(secs) = explicit {
        return Ok(secs);
    }
    if let Some(raw) = env("TEAMSYNC_TIMEOUT_SECS") {
        return raw.parse().map_err(|_| ConfigError::InvalidValue {
            field: "request_timeout_secs",
            value: raw,
        });
    }
    Ok(file.unwrap_or(DEFAULT_TIMEOUT_SECS))
}

// ---------------------------------------------------------------------------
// SyncConfig
// ---------------------------------------------------------------------------

impl SyncConfig {
    /// Resolve with an explicit environment lookup and home directory.
    pub fn resolve_at(
        overrides: &Overrides,
        env: EnvLookup,
        home: &Path,
    ) -> Result<Self, ConfigError> {
        let path = overrides
            .config_file
            .clone()
            .unwrap_or_else(|| config_path_at(home));
        let file = load_file(&path)?;

        let directory = Endpoint {
            url: required(
                pick(
                    overrides.directory_url.clone(),
                    "TEAMSYNC_DIRECTORY_URL",
                    env,
                    file.directory.url,
                ),
                "directory.url",
            )?,
            username: required(
                pick(
                    overrides.directory_user.clone(),
                    "TEAMSYNC_DIRECTORY_USER",
                    env,
                    file.directory.username,
                ),
                "directory.username",
            )?,
            password: required(
                pick(
                    overrides.directory_password.clone(),
                    "TEAMSYNC_DIRECTORY_PASSWORD",
                    env,
                    file.directory.password,
                ),
                "directory.password",
            )?,
        };

        let rolestore = Endpoint {
            url: required(
                pick(
                    overrides.rolestore_url.clone(),
                    "TEAMSYNC_ROLESTORE_URL",
                    env,
                    file.rolestore.url,
                ),
                "rolestore.url",
            )?,
            username: required(
                pick(
                    overrides.rolestore_user.clone(),
                    "TEAMSYNC_ROLESTORE_USER",
                    env,
                    file.rolestore.username,
                ),
                "rolestore.username",
            )?,
            password: required(
                pick(
                    overrides.rolestore_password.clone(),
                    "TEAMSYNC_ROLESTORE_PASSWORD",
                    env,
                    file.rolestore.password,
                ),
                "rolestore.password",
            )?,
        };

        let conflict_log = overrides
            .conflict_log
            .clone()
            .or_else(|| env("TEAMSYNC_CONFLICT_LOG").map(PathBuf::from))
            .or(file.conflict_log)
            .unwrap_or_else(|| home.join(".teamsync").join("conflicts.log"));

        Ok(SyncConfig {
            directory,
            rolestore,
            request_timeout_secs: pick_timeout(
                overrides.request_timeout_secs,
                env,
                file.request_timeout_secs,
            )?,
            conflict_log,
        })
    }

    /// `resolve_at` convenience wrapper using the real environment and home.
    pub fn resolve(overrides: &Overrides) -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Self::resolve_at(overrides, &|key| std::env::var(key).ok(), &home)
    }
}

// ---------------------------------------------------------------------------
// WatchConfig
// ---------------------------------------------------------------------------

impl WatchConfig {
    /// Resolve with an explicit environment lookup and home directory.
    pub fn resolve_at(
        overrides: &Overrides,
        env: EnvLookup,
        home: &Path,
    ) -> Result<Self, ConfigError> {
        let path = overrides
            .config_file
            .clone()
            .unwrap_or_else(|| config_path_at(home));
        let file = load_file(&path)?;

        let version_dir = overrides
            .version_dir
            .clone()
            .or_else(|| env("TEAMSYNC_VERSION_DIR").map(PathBuf::from))
            .or(file.watch.version_dir)
            .unwrap_or_else(|| home.join(".teamsync").join("versions"));

        let slack_webhook = pick(
            overrides.slack_webhook.clone(),
            "TEAMSYNC_SLACK_WEBHOOK",
            env,
            file.watch.slack_webhook,
        );

        Ok(WatchConfig {
            version_dir,
            slack_webhook,
            request_timeout_secs: pick_timeout(
                overrides.request_timeout_secs,
                env,
                file.request_timeout_secs,
            )?,
        })
    }

    /// `resolve_at` convenience wrapper using the real environment and home.
    pub fn resolve(overrides: &Overrides) -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Self::resolve_at(overrides, &|key| std::env::var(key).ok(), &home)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

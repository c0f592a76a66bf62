//! Error types for teamsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure reading the config file.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A required field was not supplied by any configuration layer.
    #[error("missing config value '{field}'; set it via CLI flag, environment, or config file")]
    MissingField { field: &'static str },

    /// A supplied value could not be parsed (e.g. a non-numeric timeout).
    #[error("invalid config value '{value}' for '{field}'")]
    InvalidValue { field: &'static str, value: String },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.teamsync/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

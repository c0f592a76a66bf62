//! Error types for teamsync-watch.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from a version check.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Page fetch failed after the bounded retry budget.
    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// The page was fetched but no version string matched the pattern.
    #[error("no version found at {url}")]
    NoVersionFound { url: String },

    /// The page was fetched but its body could not be read as text.
    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// Version cookie I/O failure, with annotated path.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The webhook rejected or never received the notification.
    #[error("notification failed: {0}")]
    Notify(String),

    /// A change was detected but no webhook is configured.
    #[error("new version detected but no Slack webhook is configured")]
    MissingWebhook,
}

/// Convenience constructor for [`WatchError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> WatchError {
    WatchError::Io {
        path: path.into(),
        source,
    }
}

//! Error types for teamsync-directory.

use thiserror::Error;

/// All errors that can arise from directory operations.
///
/// Only [`DirectoryError::Auth`] is fatal to a sync run; the reconciler
/// recovers from every per-team failure.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Authentication against the directory was rejected. Fatal.
    #[error("directory authentication failed: {0}")]
    Auth(String),

    /// The directory refused access to one team's member list (HTTP 403).
    /// Recovered per team — treated as zero members.
    #[error("access denied to team '{team}'")]
    Denied { team: String },

    /// Transport or non-auth HTTP failure. `ureq::Error` is boxed because it
    /// carries a full response body on status errors.
    #[error("directory request failed: {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// The endpoint answered but the body was not the expected JSON.
    #[error("unexpected directory response from {url}: {source}")]
    Response {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

//! Error types for teamsync-pipeline.
//!
//! Only run-fatal conditions live here. Per-group and per-role failures are
//! recovered inside the pass and surface as data ([`crate::RoleOutcome`] and
//! the conflict report), not as errors.

use std::path::PathBuf;

use thiserror::Error;

use teamsync_directory::DirectoryError;

/// Conditions that abort a whole sync run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Directory failure before any membership was reconciled
    /// (authentication, or the team listing itself).
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// The role store rejected the configured credentials mid-run.
    #[error("role store authentication failed: {0}")]
    RoleStoreAuth(String),

    /// The directory listed zero teams — nothing to sync is treated as an
    /// unrecoverable condition, not a silent success.
    #[error("directory returned zero teams; check credentials and permissions")]
    NoTeams,

    /// I/O failure writing the conflict log, with annotated path.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`PipelineError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PipelineError {
    PipelineError::Io {
        path: path.into(),
        source,
    }
}

//! Error types for teamsync-rolestore.

use thiserror::Error;

/// All errors that can arise from role-store operations.
///
/// [`RoleStoreError::Auth`] is fatal to a sync run; everything else is
/// contained at the per-role boundary by the orchestrator.
#[derive(Debug, Error)]
pub enum RoleStoreError {
    /// The store rejected the configured credentials. Fatal.
    #[error("role store authentication failed: {0}")]
    Auth(String),

    /// Transport or non-auth HTTP failure. `ureq::Error` is boxed because it
    /// carries a full response body on status errors.
    #[error("role store request failed: {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// The endpoint answered but the body was not the expected JSON.
    #[error("unexpected role store response from {url}: {source}")]
    Response {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

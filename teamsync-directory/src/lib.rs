//! # teamsync-directory
//!
//! Source-side access: the directory HTTP client and the name reconciler.
//!
//! Call [`DirectoryClient::connect`] to authenticate against the directory,
//! then [`reconcile`] to turn its teams into a conflict-checked membership
//! mapping keyed by short name.

pub mod client;
pub mod error;
pub mod reconcile;

pub use client::{Directory, DirectoryClient};
pub use error::DirectoryError;
pub use reconcile::{reconcile, Reconciliation};

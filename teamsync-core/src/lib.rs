//! # teamsync-core
//!
//! Domain types, configuration resolution, and shared errors for teamsync.
//!
//! Nothing in this crate touches the network; the HTTP clients live in
//! `teamsync-directory` and `teamsync-rolestore`.

pub mod config;
pub mod error;
pub mod types;

pub use config::{Endpoint, Overrides, SyncConfig, WatchConfig};
pub use error::ConfigError;
pub use types::{Conflict, Memberships, RoleName, Team, TeamId, TeamPath, Username};

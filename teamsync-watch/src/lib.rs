//! # teamsync-watch
//!
//! Version polling: fetch a vendor download/release page, extract the
//! advertised version, compare it against a flat-file cookie, and notify a
//! Slack webhook on change.
//!
//! Each check is a standalone sequential pipeline; [`check::run_check`] is
//! the entry point, [`targets::BUILTIN`] lists the known pages.

pub mod check;
pub mod cookie;
pub mod error;
pub mod notify;
pub mod retry;
pub mod targets;
pub mod version;

pub use check::{run_check, CheckOutcome, CheckSpec};
pub use error::WatchError;
pub use targets::{find_target, CheckTarget, BUILTIN};

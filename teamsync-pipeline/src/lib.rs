//! # teamsync-pipeline
//!
//! The sync orchestrator: one sequential pass composing the directory
//! client, the name reconciler, and the role store.
//!
//! Call [`run`] with anything implementing the `Directory` and `RoleStore`
//! traits and a [`SyncOptions`]; inspect the returned [`SyncOutcome`].

pub mod error;
pub mod report;
pub mod run;

pub use error::PipelineError;
pub use report::{append_conflict_log, render_conflicts};
pub use run::{run, RoleOutcome, RoleResult, SyncOptions, SyncOutcome};

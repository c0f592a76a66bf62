//! # teamsync-rolestore
//!
//! Target-side access: idempotent role and role-mapping upserts against the
//! role store's security API, plus the deep placeholder substitution used to
//! instantiate role-permission templates.

pub mod client;
pub mod error;
pub mod template;

pub use client::{ensure_role, mapping_body, upsert_role_mapping, RoleStore, RoleStoreClient};
pub use error::RoleStoreError;
pub use template::{default_role_template, substitute, ROLE_TOKEN};

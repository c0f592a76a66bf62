//! Role store HTTP client and the per-role upsert operations.
//!
//! ## Upsert semantics
//!
//! `put_role_mapping` fully replaces the remote rule set — there is no diff
//! against the previous remote state and no history kept. `ensure_role`
//! never touches a role that already exists, even when the template changed;
//! existing permissions stay exactly as an operator left them.

use std::collections::BTreeSet;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};

use teamsync_core::config::Endpoint;
use teamsync_core::types::{RoleName, Username};

use crate::error::RoleStoreError;
use crate::template;

// ---------------------------------------------------------------------------
// Trait seam
// ---------------------------------------------------------------------------

/// Write access to the role store's security API.
///
/// The orchestrator depends on this trait; tests use in-memory fakes.
pub trait RoleStore {
    /// The role's current definition, or `None` if it does not exist.
    fn get_role(&self, name: &RoleName) -> Result<Option<Value>, RoleStoreError>;

    /// Create or replace a role definition.
    fn put_role(&self, name: &RoleName, definition: &Value) -> Result<(), RoleStoreError>;

    /// Create or replace a role-to-user mapping. Full replacement.
    fn put_role_mapping(&self, name: &RoleName, mapping: &Value) -> Result<(), RoleStoreError>;
}

// ---------------------------------------------------------------------------
// Per-role operations
// ---------------------------------------------------------------------------

/// Full replacement mapping body: one username predicate per member,
/// combined with logical OR. Members arrive as a sorted set, so the same
/// membership always produces the identical body.
pub fn mapping_body(name: &RoleName, usernames: &BTreeSet<Username>, enabled: bool) -> Value {
    json!({
        "enabled": enabled,
        "roles": [name.as_str()],
        "rules": {
            "any": usernames
                .iter()
                .map(|u| json!({"field": {"username": u.0}}))
                .collect::<Vec<_>>()
        }
    })
}

/// Overwrite the role's mapping with exactly `usernames`. Idempotent.
pub fn upsert_role_mapping<S: RoleStore + ?Sized>(
    store: &S,
    name: &RoleName,
    usernames: &BTreeSet<Username>,
    enabled: bool,
) -> Result<(), RoleStoreError> {
    store.put_role_mapping(name, &mapping_body(name, usernames, enabled))?;
    tracing::info!("updated role mapping '{name}' with {} users", usernames.len());
    Ok(())
}

/// Create the role from `template` unless it already exists.
///
/// Returns `true` when the role was created. An existing role is a strict
/// no-op regardless of template content.
pub fn ensure_role<S: RoleStore + ?Sized>(
    store: &S,
    name: &RoleName,
    role_template: &Value,
) -> Result<bool, RoleStoreError> {
    if store.get_role(name)?.is_some() {
        tracing::debug!("role '{name}' already exists, leaving it untouched");
        return Ok(false);
    }
    store.put_role(name, &template::substitute(role_template, name))?;
    tracing::info!("created role '{name}'");
    Ok(true)
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// Basic-auth client for the role store's `_security` endpoints.
pub struct RoleStoreClient {
    agent: ureq::Agent,
    base_url: String,
    authorization: String,
}

impl RoleStoreClient {
    pub fn new(endpoint: &Endpoint, timeout: Duration) -> Self {
        let credentials = BASE64.encode(format!("{}:{}", endpoint.username, endpoint.password));
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            base_url: endpoint.url.trim_end_matches('/').to_string(),
            authorization: format!("Basic {credentials}"),
        }
    }

    fn classify(url: &str, e: ureq::Error) -> RoleStoreError {
        match e {
            ureq::Error::Status(401 | 403, _) => RoleStoreError::Auth(e.to_string()),
            other => RoleStoreError::Http {
                url: url.to_string(),
                source: Box::new(other),
            },
        }
    }

    fn put_json(&self, url: &str, body: &Value) -> Result<(), RoleStoreError> {
        self.agent
            .put(url)
            .set("Authorization", &self.authorization)
            .send_json(body.clone())
            .map_err(|e| Self::classify(url, e))?;
        Ok(())
    }
}

impl RoleStore for RoleStoreClient {
    fn get_role(&self, name: &RoleName) -> Result<Option<Value>, RoleStoreError> {
        let url = format!("{}/_security/role/{name}", self.base_url);
        let response = match self
            .agent
            .get(&url)
            .set("Authorization", &self.authorization)
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Ok(None),
            Err(e) => return Err(Self::classify(&url, e)),
        };
        let body: Value = response
            .into_json()
            .map_err(|source| RoleStoreError::Response { url, source })?;
        Ok(body.get(name.as_str()).cloned().or(Some(body)))
    }

    fn put_role(&self, name: &RoleName, definition: &Value) -> Result<(), RoleStoreError> {
        let url = format!("{}/_security/role/{name}", self.base_url);
        self.put_json(&url, definition)
    }

    fn put_role_mapping(&self, name: &RoleName, mapping: &Value) -> Result<(), RoleStoreError> {
        let url = format!("{}/_security/role_mapping/{name}", self.base_url);
        self.put_json(&url, mapping)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

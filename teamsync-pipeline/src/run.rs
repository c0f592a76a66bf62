//! Sync orchestration: fetch → reconcile → filter → push.

use std::collections::BTreeSet;

use serde_json::Value;

use teamsync_core::types::{Memberships, RoleName};
use teamsync_directory::{reconcile, Directory, DirectoryError};
use teamsync_rolestore::{
    default_role_template, ensure_role, upsert_role_mapping, RoleStore, RoleStoreError,
};

use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Options and outcome
// ---------------------------------------------------------------------------

/// Options for one sync pass.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Restrict the push to these short names (exact match). `None` = all.
    pub team_filter: Option<BTreeSet<String>>,
    /// Create roles that do not exist in the store, from `role_template`.
    pub create_missing_roles: bool,
    /// Fetch and reconcile only; render what would be pushed, mutate nothing.
    pub dry_run: bool,
    /// `enabled` flag written into every pushed mapping.
    pub enabled: bool,
    /// Permission template for created roles ([`teamsync_rolestore::ROLE_TOKEN`]
    /// is substituted per role).
    pub role_template: Value,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            team_filter: None,
            create_missing_roles: false,
            dry_run: false,
            enabled: true,
            role_template: default_role_template(),
        }
    }
}

/// Outcome of pushing (or skipping) a single role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleOutcome {
    /// Mapping upserted; `role_created` is set when `ensure_role` made the role.
    Synced { users: usize, role_created: bool },
    /// Dry run: the mapping *would* have been upserted.
    WouldSync { users: usize },
    /// Empty member set — never pushed, counted in neither counter.
    SkippedEmpty,
    /// Per-role failure, contained; the next role proceeds.
    Failed { error: String },
}

/// One role's result within a [`SyncOutcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleResult {
    pub name: RoleName,
    pub outcome: RoleOutcome,
}

/// Summary of one sync pass.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// The reconciled mapping after filtering — what the push loop saw.
    pub memberships: Memberships,
    pub conflicts: Vec<teamsync_core::types::Conflict>,
    pub roles: Vec<RoleResult>,
}

impl SyncOutcome {
    pub fn synced(&self) -> usize {
        self.roles
            .iter()
            .filter(|r| matches!(r.outcome, RoleOutcome::Synced { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.roles
            .iter()
            .filter(|r| matches!(r.outcome, RoleOutcome::Failed { .. }))
            .count()
    }
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Run one full sync pass.
///
/// Sequential and synchronous throughout. Per-role failures are contained
/// and counted; only authentication failures and an empty team listing abort
/// the run.
pub fn run<D, S>(
    directory: &D,
    store: &S,
    options: &SyncOptions,
) -> Result<SyncOutcome, PipelineError>
where
    D: Directory + ?Sized,
    S: RoleStore + ?Sized,
{
    tracing::info!("starting membership sync{}", if options.dry_run { " (dry run)" } else { "" });

    let reconciliation = reconcile(directory)?;
    if reconciliation.teams_seen == 0 {
        return Err(PipelineError::NoTeams);
    }

    let mut memberships = reconciliation.memberships;
    if let Some(filter) = &options.team_filter {
        memberships.retain(|name, _| filter.contains(name.as_str()));
    }

    let mut roles = Vec::new();
    for (name, usernames) in &memberships {
        if usernames.is_empty() {
            tracing::warn!("role '{name}' has no members, skipping");
            roles.push(RoleResult {
                name: name.clone(),
                outcome: RoleOutcome::SkippedEmpty,
            });
            continue;
        }

        if options.dry_run {
            roles.push(RoleResult {
                name: name.clone(),
                outcome: RoleOutcome::WouldSync {
                    users: usernames.len(),
                },
            });
            continue;
        }

        roles.push(RoleResult {
            name: name.clone(),
            outcome: push_role(store, name, usernames, options)?,
        });
    }

    let outcome = SyncOutcome {
        memberships,
        conflicts: reconciliation.conflicts,
        roles,
    };
    tracing::info!(
        "sync complete: {} successful, {} failed, {} conflicts",
        outcome.synced(),
        outcome.failed(),
        outcome.conflicts.len()
    );
    Ok(outcome)
}

/// Push one role. Auth failures escape as fatal; everything else becomes
/// [`RoleOutcome::Failed`].
fn push_role<S: RoleStore + ?Sized>(
    store: &S,
    name: &RoleName,
    usernames: &BTreeSet<teamsync_core::types::Username>,
    options: &SyncOptions,
) -> Result<RoleOutcome, PipelineError> {
    let mut role_created = false;
    if options.create_missing_roles {
        match ensure_role(store, name, &options.role_template) {
            Ok(created) => role_created = created,
            Err(e) => return contain(name, e),
        }
    }

    match upsert_role_mapping(store, name, usernames, options.enabled) {
        Ok(()) => Ok(RoleOutcome::Synced {
            users: usernames.len(),
            role_created,
        }),
        Err(e) => contain(name, e),
    }
}

fn contain(name: &RoleName, e: RoleStoreError) -> Result<RoleOutcome, PipelineError> {
    if let RoleStoreError::Auth(reason) = e {
        return Err(PipelineError::RoleStoreAuth(reason));
    }
    tracing::error!("failed to sync role '{name}': {e}");
    Ok(RoleOutcome::Failed {
        error: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    use serde_json::json;

    use teamsync_core::types::{Team, TeamId, TeamPath, Username};

    use super::*;

    struct FakeDirectory {
        entries: Vec<(&'static str, &'static str, Vec<&'static str>)>,
    }

    impl Directory for FakeDirectory {
        fn list_teams(&self) -> Result<Vec<Team>, DirectoryError> {
            Ok(self
                .entries
                .iter()
                .map(|(path, id, _)| Team {
                    full_path: TeamPath::from(*path),
                    id: TeamId::from(*id),
                })
                .collect())
        }

        fn list_team_members(&self, team: &Team) -> Result<Vec<Username>, DirectoryError> {
            Ok(self
                .entries
                .iter()
                .find(|(_, id, _)| TeamId::from(*id) == team.id)
                .map(|(_, _, users)| users.iter().map(|u| Username::from(*u)).collect())
                .unwrap_or_default())
        }
    }

    /// In-memory role store recording every mutating call.
    #[derive(Default)]
    struct FakeStore {
        roles: RefCell<BTreeMap<String, Value>>,
        mappings: RefCell<BTreeMap<String, Value>>,
        fail_mapping_for: Option<&'static str>,
        auth_fails: bool,
        puts: RefCell<usize>,
    }

    impl RoleStore for FakeStore {
        fn get_role(&self, name: &RoleName) -> Result<Option<Value>, RoleStoreError> {
            Ok(self.roles.borrow().get(name.as_str()).cloned())
        }

        fn put_role(&self, name: &RoleName, definition: &Value) -> Result<(), RoleStoreError> {
            *self.puts.borrow_mut() += 1;
            self.roles
                .borrow_mut()
                .insert(name.to_string(), definition.clone());
            Ok(())
        }

        fn put_role_mapping(&self, name: &RoleName, mapping: &Value) -> Result<(), RoleStoreError> {
            if self.auth_fails {
                return Err(RoleStoreError::Auth("bad credentials".into()));
            }
            if self.fail_mapping_for == Some(name.as_str()) {
                return Err(RoleStoreError::Response {
                    url: format!("fake://{name}"),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
                });
            }
            *self.puts.borrow_mut() += 1;
            self.mappings
                .borrow_mut()
                .insert(name.to_string(), mapping.clone());
            Ok(())
        }
    }

    fn directory() -> FakeDirectory {
        FakeDirectory {
            entries: vec![
                ("/Org/QA", "1", vec!["u1"]),
                ("/Org/IT", "2", vec!["u2"]),
                ("/Org/Empty", "3", vec![]),
            ],
        }
    }

    fn filter(names: &[&str]) -> Option<BTreeSet<String>> {
        Some(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn filter_restricts_push_to_named_roles() {
        let store = FakeStore::default();
        let options = SyncOptions {
            team_filter: filter(&["QA"]),
            ..SyncOptions::default()
        };
        let outcome = run(&directory(), &store, &options).expect("run");

        assert_eq!(outcome.synced(), 1);
        assert_eq!(outcome.failed(), 0);
        let mappings = store.mappings.borrow();
        assert!(mappings.contains_key("QA"));
        assert!(!mappings.contains_key("IT"));
    }

    #[test]
    fn empty_role_is_skipped_and_counted_in_neither_counter() {
        let store = FakeStore::default();
        let outcome = run(&directory(), &store, &SyncOptions::default()).expect("run");

        assert_eq!(outcome.synced(), 2);
        assert_eq!(outcome.failed(), 0);
        let empty = outcome
            .roles
            .iter()
            .find(|r| r.name.as_str() == "Empty")
            .expect("result for empty role");
        assert_eq!(empty.outcome, RoleOutcome::SkippedEmpty);
        assert!(!store.mappings.borrow().contains_key("Empty"));
    }

    #[test]
    fn dry_run_reconciles_but_issues_zero_mutating_calls() {
        let store = FakeStore::default();
        let wet = run(&directory(), &store, &SyncOptions::default()).expect("wet run");

        let dry_store = FakeStore::default();
        let options = SyncOptions {
            dry_run: true,
            create_missing_roles: true,
            ..SyncOptions::default()
        };
        let dry = run(&directory(), &dry_store, &options).expect("dry run");

        assert_eq!(dry.memberships, wet.memberships, "same reconciled mapping");
        assert_eq!(*dry_store.puts.borrow(), 0, "dry run must not mutate");
        assert!(dry.roles.iter().all(|r| matches!(
            r.outcome,
            RoleOutcome::WouldSync { .. } | RoleOutcome::SkippedEmpty
        )));
    }

    #[test]
    fn per_role_failure_is_contained_and_counted() {
        let store = FakeStore {
            fail_mapping_for: Some("IT"),
            ..FakeStore::default()
        };
        let outcome = run(&directory(), &store, &SyncOptions::default()).expect("run");

        assert_eq!(outcome.synced(), 1);
        assert_eq!(outcome.failed(), 1);
        assert!(store.mappings.borrow().contains_key("QA"), "QA still synced");
    }

    #[test]
    fn role_store_auth_failure_is_fatal() {
        let store = FakeStore {
            auth_fails: true,
            ..FakeStore::default()
        };
        let err = run(&directory(), &store, &SyncOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::RoleStoreAuth(_)));
    }

    #[test]
    fn zero_teams_is_an_error() {
        let store = FakeStore::default();
        let empty = FakeDirectory { entries: vec![] };
        let err = run(&empty, &store, &SyncOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::NoTeams));
    }

    #[test]
    fn create_missing_roles_instantiates_the_template_once() {
        let store = FakeStore::default();
        store
            .roles
            .borrow_mut()
            .insert("QA".into(), json!({"cluster": ["all"]}));
        let options = SyncOptions {
            create_missing_roles: true,
            ..SyncOptions::default()
        };
        let outcome = run(&directory(), &store, &options).expect("run");

        // QA existed: untouched. IT did not: created from the template.
        let roles = store.roles.borrow();
        assert_eq!(roles.get("QA"), Some(&json!({"cluster": ["all"]})));
        assert_eq!(roles.get("IT").unwrap()["indices"][0]["names"][0], "IT-*");
        let it = outcome
            .roles
            .iter()
            .find(|r| r.name.as_str() == "IT")
            .expect("IT result");
        assert_eq!(
            it.outcome,
            RoleOutcome::Synced {
                users: 1,
                role_created: true
            }
        );
    }
}

//! Name reconciliation: team paths → conflict-checked role membership map.
//!
//! ## Conflict policy
//!
//! A short name claimed by two or more distinct full paths is a conflict.
//! Every contributing team is excluded from the run — no tie-break, no
//! merge. Silent resolution would let one team invisibly see another
//! team's data, so the run fails loud and leaves resolution to an operator.

use std::collections::BTreeMap;

use teamsync_core::types::{Conflict, Memberships, RoleName, Team, TeamPath};

use crate::client::Directory;
use crate::error::DirectoryError;

/// Output of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Role name → deduplicated member set, conflicting names excluded.
    pub memberships: Memberships,
    /// Every conflicting short name with all contributing full paths.
    pub conflicts: Vec<Conflict>,
    /// Teams listed by the directory, before any exclusion.
    pub teams_seen: usize,
}

/// Fetch all teams and reconcile them into a membership mapping.
///
/// A member-fetch failure for one team is logged and treated as zero members
/// for that team; it never aborts the pass. Authentication failures do abort
/// — a mid-run token rejection means nothing further can succeed.
pub fn reconcile<D: Directory + ?Sized>(directory: &D) -> Result<Reconciliation, DirectoryError> {
    let teams = directory.list_teams()?;
    let teams_seen = teams.len();

    // Short name → distinct contributing teams. Re-listings of the same full
    // path are not a conflict.
    let mut by_short: BTreeMap<String, Vec<&Team>> = BTreeMap::new();
    for team in &teams {
        let Some(short) = team.full_path.short_name() else {
            tracing::warn!("team '{}' has no usable path segment, skipping", team.full_path);
            continue;
        };
        let entry = by_short.entry(short.to_string()).or_default();
        if !entry.iter().any(|t| t.full_path == team.full_path) {
            entry.push(team);
        }
    }

    let mut memberships = Memberships::new();
    let mut conflicts = Vec::new();

    for (short, contenders) in by_short {
        if contenders.len() > 1 {
            let mut full_paths: Vec<TeamPath> =
                contenders.iter().map(|t| t.full_path.clone()).collect();
            full_paths.sort();
            tracing::warn!(
                "short name '{short}' claimed by {} teams, excluding all of them this run",
                full_paths.len()
            );
            conflicts.push(Conflict {
                short_name: short,
                full_paths,
            });
            continue;
        }

        let team = contenders[0];
        let members = match directory.list_team_members(team) {
            Ok(members) => members,
            Err(DirectoryError::Auth(reason)) => return Err(DirectoryError::Auth(reason)),
            Err(DirectoryError::Denied { team }) => {
                tracing::warn!("access denied to team '{team}', treating as empty");
                Vec::new()
            }
            Err(e) => {
                tracing::error!("failed to fetch members of '{}': {e}", team.full_path);
                Vec::new()
            }
        };
        memberships.insert(RoleName::from(short), members.into_iter().collect());
    }

    Ok(Reconciliation {
        memberships,
        conflicts,
        teams_seen,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

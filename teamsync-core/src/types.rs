//! Domain types for the membership sync.
//!
//! Role names and usernames live in `BTreeMap`/`BTreeSet` throughout so that
//! deduplication and sorted display fall out of the container choice rather
//! than ad-hoc sorting at print time.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Opaque identifier for a team in the source directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub String);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TeamId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TeamId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Slash-delimited hierarchical path of a team, e.g. `/Org/Security/QA`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamPath(pub String);

impl TeamPath {
    /// The last non-empty slash segment, used as the target role name.
    ///
    /// Returns `None` for paths with no non-empty segment (e.g. `""` or `"/"`).
    pub fn short_name(&self) -> Option<&str> {
        self.0.rsplit('/').find(|segment| !segment.is_empty())
    }
}

impl fmt::Display for TeamPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TeamPath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TeamPath {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A role name in the target store. Always a reconciled short name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleName(pub String);

impl RoleName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RoleName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RoleName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A user identifier as reported by the source directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Username(pub String);

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Username {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Username {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A team record from the source directory. Read-only to this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub full_path: TeamPath,
    pub id: TeamId,
}

/// Reconciled membership mapping: role name → deduplicated member set.
pub type Memberships = BTreeMap<RoleName, BTreeSet<Username>>;

/// A short name claimed by two or more distinct team paths within one run.
///
/// Every contributing team is excluded from the run's output mapping; the
/// conflict is reported for manual resolution instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub short_name: String,
    /// All contributing full paths, sorted for deterministic reports.
    pub full_paths: Vec<TeamPath>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn newtype_display() {
        assert_eq!(TeamId::from("42").to_string(), "42");
        assert_eq!(RoleName::from("QA").to_string(), "QA");
        assert_eq!(Username::from("alice").to_string(), "alice");
    }

    #[rstest]
    #[case("/Org/A/X", Some("X"))]
    #[case("Org/B", Some("B"))]
    #[case("/Org/QA/", Some("QA"))]
    #[case("QA", Some("QA"))]
    #[case("", None)]
    #[case("/", None)]
    #[case("///", None)]
    fn short_name_is_last_non_empty_segment(#[case] path: &str, #[case] expected: Option<&str>) {
        assert_eq!(TeamPath::from(path).short_name(), expected);
    }

    #[test]
    fn newtype_equality() {
        assert_eq!(RoleName::from("x"), RoleName::from(String::from("x")));
    }
}

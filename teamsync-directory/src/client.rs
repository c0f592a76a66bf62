//! Directory HTTP client.
//!
//! The directory is an OAuth-password-grant API: `connect` trades the
//! configured credentials for a bearer token, then every call rides the same
//! `ureq::Agent` with that token. All calls are synchronous; the request
//! timeout comes from the resolved config.

use std::time::Duration;

use serde::Deserialize;

use teamsync_core::config::Endpoint;
use teamsync_core::types::{Team, TeamId, TeamPath, Username};

use crate::error::DirectoryError;

// ---------------------------------------------------------------------------
// Trait seam
// ---------------------------------------------------------------------------

/// Read access to the source directory.
///
/// The reconciler and the orchestrator only depend on this trait; tests use
/// in-memory fakes instead of the HTTP client.
pub trait Directory {
    /// All teams visible to the authenticated account.
    fn list_teams(&self) -> Result<Vec<Team>, DirectoryError>;

    /// Member usernames of one team. May fail with
    /// [`DirectoryError::Denied`] per team.
    fn list_team_members(&self, team: &Team) -> Result<Vec<Username>, DirectoryError>;
}

// ---------------------------------------------------------------------------
// Wire formats
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Team ids arrive as integers from older directory releases and as strings
/// from newer ones; both collapse into the opaque [`TeamId`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Num(u64),
    Str(String),
}

impl From<IdRepr> for TeamId {
    fn from(id: IdRepr) -> Self {
        match id {
            IdRepr::Num(n) => TeamId(n.to_string()),
            IdRepr::Str(s) => TeamId(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TeamRecord {
    #[serde(rename = "fullName", alias = "fullPath")]
    full_name: String,
    id: IdRepr,
}

impl From<TeamRecord> for Team {
    fn from(record: TeamRecord) -> Self {
        Team {
            full_path: TeamPath(record.full_name),
            id: record.id.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MemberRecord {
    #[serde(rename = "userName", alias = "username", default)]
    username: String,
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// Authenticated client for the directory's access-control API.
pub struct DirectoryClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

impl DirectoryClient {
    /// Authenticate and return a ready client.
    ///
    /// Any rejection here is fatal to the run — there is no point starting a
    /// sync pass without directory access.
    pub fn connect(endpoint: &Endpoint, timeout: Duration) -> Result<Self, DirectoryError> {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        let base_url = endpoint.url.trim_end_matches('/').to_string();
        let url = format!("{base_url}/auth/identity/connect/token");

        let response = agent
            .post(&url)
            .send_form(&[
                ("username", endpoint.username.as_str()),
                ("password", endpoint.password.as_str()),
                ("grant_type", "password"),
                ("scope", "access_control_api"),
            ])
            .map_err(|e| DirectoryError::Auth(e.to_string()))?;
        let token: TokenResponse = response
            .into_json()
            .map_err(|source| DirectoryError::Response { url, source })?;

        tracing::info!("authenticated to directory at {base_url}");
        Ok(Self {
            agent,
            base_url,
            token: token.access_token,
        })
    }

    fn get(&self, url: &str) -> Result<ureq::Response, ureq::Error> {
        self.agent
            .get(url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .call()
    }
}

impl Directory for DirectoryClient {
    fn list_teams(&self) -> Result<Vec<Team>, DirectoryError> {
        let url = format!("{}/auth/teams", self.base_url);
        let response = self.get(&url).map_err(|e| match e {
            ureq::Error::Status(401, _) => DirectoryError::Auth(e.to_string()),
            other => DirectoryError::Http {
                url: url.clone(),
                source: Box::new(other),
            },
        })?;
        let records: Vec<TeamRecord> = response
            .into_json()
            .map_err(|source| DirectoryError::Response { url, source })?;
        tracing::info!("retrieved {} teams from the directory", records.len());
        Ok(records.into_iter().map(Team::from).collect())
    }

    fn list_team_members(&self, team: &Team) -> Result<Vec<Username>, DirectoryError> {
        let url = format!("{}/auth/teams/{}/users", self.base_url, team.id);
        let response = self.get(&url).map_err(|e| match e {
            ureq::Error::Status(403, _) => DirectoryError::Denied {
                team: team.full_path.to_string(),
            },
            ureq::Error::Status(401, _) => DirectoryError::Auth(e.to_string()),
            other => DirectoryError::Http {
                url: url.clone(),
                source: Box::new(other),
            },
        })?;
        let records: Vec<MemberRecord> = response
            .into_json()
            .map_err(|source| DirectoryError::Response { url, source })?;
        Ok(records
            .into_iter()
            .filter(|r| !r.username.is_empty())
            .map(|r| Username(r.username))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

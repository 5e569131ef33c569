//! Multi-workspace routing for Linear clients.
//!
//! The registry owns one [`LinearClient`] per configured workspace and
//! answers "which workspace does this team live in" by probing
//! workspaces in name order and remembering the answer.

use std::collections::{BTreeMap, HashMap};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::client::LinearClient;
use super::error::LinearError;
use super::models::Team;
use crate::config::Settings;

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static IDENTIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)-(\d+)$").unwrap());

/// Errors raised while routing requests to a workspace.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The named workspace is not part of the registry.
    #[error("Workspace '{name}' not configured. Available: {available}")]
    UnknownWorkspace {
        /// Workspace name that was requested.
        name: String,
        /// Comma-separated list of configured workspace names.
        available: String,
    },

    /// No configured workspace contains the team.
    #[error(
        "Team '{team}' not found in any workspace. Searched workspaces: {searched}. \
         Use linear_list_workspaces to see available teams."
    )]
    TeamNotFound {
        /// Team key that was searched for.
        team: String,
        /// Comma-separated list of workspaces that were probed.
        searched: String,
    },

    /// Issue identifier does not look like `TEAM-123`.
    #[error("Invalid issue identifier format: '{0}'. Expected format: TEAM-123 (e.g., PROJ-123)")]
    InvalidIdentifier(String),

    /// Error from an underlying workspace client.
    #[error(transparent)]
    Linear(#[from] LinearError),
}

/// Teams visible in one workspace, or the error that kept us from
/// listing them.
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceTeams {
    /// Workspace name as configured.
    pub workspace: String,
    /// Error message when the workspace query failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Teams found, empty when the query failed.
    pub teams: Vec<Team>,
}

/// Registry of Linear clients across configured workspaces.
///
/// Clients are constructed eagerly so misconfigured API keys surface at
/// startup. Team key lookups are cached after the first successful probe.
#[derive(Debug)]
pub struct WorkspaceRegistry {
    clients: BTreeMap<String, LinearClient>,
    team_cache: Mutex<HashMap<String, String>>,
}

impl WorkspaceRegistry {
    /// Build a registry from `workspace name -> API key` pairs.
    pub fn new(
        workspaces: &BTreeMap<String, String>,
        api_url: &str,
        timeout: Duration,
    ) -> Result<Self, RegistryError> {
        let mut clients = BTreeMap::new();
        for (name, api_key) in workspaces {
            let client = LinearClient::new(api_key, api_url, timeout)?;
            clients.insert(name.clone(), client);
        }
        Ok(Self {
            clients,
            team_cache: Mutex::new(HashMap::new()),
        })
    }

    /// Build a registry from loaded application settings.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let workspaces = settings.resolved_workspaces()?;
        let registry = Self::new(&workspaces, &settings.linear_api_url, settings.request_timeout)?;
        Ok(registry)
    }

    /// Configured workspace names in registry order.
    pub fn workspace_names(&self) -> Vec<&str> {
        self.clients.keys().map(String::as_str).collect()
    }

    /// Client for a workspace by name.
    pub fn client(&self, workspace_name: &str) -> Result<&LinearClient, RegistryError> {
        self.clients
            .get(workspace_name)
            .ok_or_else(|| RegistryError::UnknownWorkspace {
                name: workspace_name.to_string(),
                available: self.available(),
            })
    }

    /// Resolve which workspace contains the given team key.
    ///
    /// Consults the team cache first, then probes workspaces in registry
    /// order. Workspaces whose probe errors are skipped so a single bad
    /// key does not mask a team living elsewhere.
    pub async fn client_for_team(&self, team_key: &str) -> Result<&LinearClient, RegistryError> {
        let team_key_upper = team_key.to_uppercase();

        let cached = self.team_cache().get(&team_key_upper).cloned();
        if let Some(workspace) = cached {
            debug!(team = %team_key_upper, workspace = %workspace, "Team cache hit");
            return self.client(&workspace);
        }

        for (name, client) in &self.clients {
            match client.get_team_by_key(&team_key_upper).await {
                Ok(Some(_)) => {
                    debug!(team = %team_key_upper, workspace = %name, "Resolved team to workspace");
                    self.team_cache()
                        .insert(team_key_upper, name.clone());
                    return Ok(client);
                }
                Ok(None) => {}
                Err(e) => {
                    debug!(workspace = %name, error = %e, "Workspace probe failed, skipping");
                }
            }
        }

        Err(RegistryError::TeamNotFound {
            team: team_key.to_string(),
            searched: self.available(),
        })
    }

    /// Resolve which workspace contains an issue by its identifier.
    ///
    /// Extracts the team key from `TEAM-123` and delegates to
    /// [`client_for_team`](Self::client_for_team).
    pub async fn client_for_issue(&self, identifier: &str) -> Result<&LinearClient, RegistryError> {
        let captures = IDENTIFIER_PATTERN
            .captures(identifier)
            .ok_or_else(|| RegistryError::InvalidIdentifier(identifier.to_string()))?;
        let team_key = &captures[1];
        self.client_for_team(team_key).await
    }

    /// List the teams of every workspace, probing them concurrently.
    ///
    /// A workspace whose query fails contributes its error message instead
    /// of failing the whole call. Successful listings warm the team cache.
    pub async fn workspaces_with_teams(&self) -> Vec<WorkspaceTeams> {
        let probes = self.clients.iter().map(|(name, client)| async move {
            (name.as_str(), client.list_teams().await)
        });
        let outcomes = future::join_all(probes).await;

        let mut summaries = Vec::with_capacity(outcomes.len());
        for (name, outcome) in outcomes {
            match outcome {
                Ok(teams) => {
                    let mut cache = self.team_cache();
                    for team in &teams {
                        cache.insert(team.key.to_uppercase(), name.to_string());
                    }
                    drop(cache);
                    summaries.push(WorkspaceTeams {
                        workspace: name.to_string(),
                        error: None,
                        teams,
                    });
                }
                Err(e) => summaries.push(WorkspaceTeams {
                    workspace: name.to_string(),
                    error: Some(e.to_string()),
                    teams: Vec::new(),
                }),
            }
        }
        summaries
    }

    fn available(&self) -> String {
        self.workspace_names().join(", ")
    }

    // Cache entries are single complete insertions, so a poisoned guard
    // still holds a usable map.
    fn team_cache(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.team_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

//! Environment-driven application settings.
//!
//! Settings come from environment variables first, with
//! `$HOME/.arc-flow/settings.json` (`{"env": {...}}`) supplying fallbacks
//! for variables that are unset.

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Default Linear GraphQL endpoint.
pub const DEFAULT_LINEAR_API_URL: &str = "https://api.linear.app/graphql";

/// Default GitHub REST endpoint.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Default HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: f64 = 30.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is set neither in the environment nor the
    /// settings file.
    #[error("Environment variable not found: {0}")]
    MissingVar(&'static str),

    /// No Linear credentials at all.
    #[error("At least one of LINEAR_API_KEY or LINEAR_WORKSPACES must be set")]
    MissingLinearCredentials,

    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// Parse failure description.
        reason: String,
    },

    /// The settings file exists but cannot be read or parsed.
    #[error("Failed to load settings file {path}: {reason}")]
    SettingsFile {
        /// File path.
        path: String,
        /// Failure description.
        reason: String,
    },
}

/// Environment variable fallbacks loaded from `$HOME/.arc-flow/settings.json`.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsFile {
    /// Variable name to value overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl SettingsFile {
    /// Loads the settings file from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from_path(path),
            None => Ok(Self::default()),
        }
    }

    /// Loads a settings file, returning empty overrides when it is absent.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::SettingsFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::SettingsFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Returns the default settings file path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".arc-flow").join("settings.json"))
    }
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Single-workspace Linear API key.
    pub linear_api_key: Option<String>,
    /// Workspace name to API key map (multi-workspace mode).
    pub linear_workspaces: Option<BTreeMap<String, String>>,
    /// Linear GraphQL endpoint.
    pub linear_api_url: String,
    /// GitHub personal access token.
    pub github_token: String,
    /// GitHub REST endpoint.
    pub github_api_url: String,
    /// GitHub organization owning the repositories.
    pub github_org: String,
    /// Default Linear project key.
    pub default_project: String,
    /// Default GitHub repository name.
    pub default_repo: String,
    /// HTTP request timeout.
    pub request_timeout: Duration,
}

impl Settings {
    /// Loads settings from the environment with settings-file fallback.
    pub fn load() -> Result<Self, ConfigError> {
        let file = SettingsFile::load()?;
        Self::from_lookup(|name| env::var(name).ok().or_else(|| file.env.get(name).cloned()))
    }

    /// Builds settings from a variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let linear_api_key = lookup("LINEAR_API_KEY");
        let linear_workspaces = match lookup("LINEAR_WORKSPACES") {
            Some(raw) => {
                let workspaces = parse_workspaces(&raw)?;
                // An empty map behaves as unset.
                (!workspaces.is_empty()).then_some(workspaces)
            }
            None => None,
        };
        if linear_api_key.is_none() && linear_workspaces.is_none() {
            return Err(ConfigError::MissingLinearCredentials);
        }

        let request_timeout = match lookup("REQUEST_TIMEOUT") {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs_f64(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        Ok(Self {
            linear_api_key,
            linear_workspaces,
            linear_api_url: lookup("LINEAR_API_URL")
                .unwrap_or_else(|| DEFAULT_LINEAR_API_URL.to_string()),
            github_token: require(&lookup, "GITHUB_TOKEN")?,
            github_api_url: lookup("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            github_org: require(&lookup, "GITHUB_ORG")?,
            default_project: require(&lookup, "DEFAULT_PROJECT")?,
            default_repo: require(&lookup, "DEFAULT_REPO")?,
            request_timeout,
        })
    }

    /// Returns the workspace name to API key mapping.
    ///
    /// `LINEAR_WORKSPACES` wins when set; otherwise the single
    /// `LINEAR_API_KEY` is wrapped as the `default` workspace.
    pub fn resolved_workspaces(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        if let Some(workspaces) = &self.linear_workspaces {
            return Ok(workspaces.clone());
        }
        match &self.linear_api_key {
            Some(key) => Ok(BTreeMap::from([("default".to_string(), key.clone())])),
            None => Err(ConfigError::MissingLinearCredentials),
        }
    }
}

// --- Extracted pure functions ---

/// Looks up a required variable.
fn require<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).ok_or(ConfigError::MissingVar(name))
}

/// Parses the `LINEAR_WORKSPACES` JSON object.
fn parse_workspaces(raw: &str) -> Result<BTreeMap<String, String>, ConfigError> {
    serde_json::from_str(raw).map_err(|e| ConfigError::InvalidValue {
        name: "LINEAR_WORKSPACES",
        reason: e.to_string(),
    })
}

/// Parses `REQUEST_TIMEOUT` seconds into a duration.
fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let secs: f64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
        name: "REQUEST_TIMEOUT",
        reason: format!("expected a number of seconds, got '{raw}'"),
    })?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigError::InvalidValue {
            name: "REQUEST_TIMEOUT",
            reason: format!("expected a positive number of seconds, got '{raw}'"),
        });
    }
    Ok(Duration::from_secs_f64(secs))
}

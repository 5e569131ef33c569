//! Wire types for the GitHub REST API.

use serde::{Deserialize, Serialize};

/// A repository as returned by `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository name without the owner.
    pub name: String,
    /// `owner/name` form.
    pub full_name: String,
    /// Name of the default branch, usually `main`.
    pub default_branch: String,
}

/// Commit reference carrying only the SHA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRef {
    /// Full commit SHA.
    pub sha: String,
}

/// A branch summary from the list branches endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Branch name.
    pub name: String,
    /// Tip commit of the branch.
    pub commit: CommitRef,
}

/// A git reference as returned by the `git/refs` endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRef {
    /// Fully qualified ref name like `refs/heads/feature/PROJ-1-x`.
    #[serde(rename = "ref")]
    pub name: String,
    /// Object the ref points at.
    pub object: CommitRef,
}

/// Head or base reference embedded in a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrBranchRef {
    /// Short branch name.
    #[serde(rename = "ref")]
    pub name: String,
    /// Tip commit SHA.
    pub sha: String,
}

/// Author reference embedded in a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrUser {
    /// GitHub login of the author.
    pub login: String,
}

/// A pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request number.
    pub number: u64,
    /// Title line.
    pub title: String,
    /// `open` or `closed`.
    pub state: String,
    /// Browser URL.
    pub html_url: String,
    /// Source branch.
    pub head: PrBranchRef,
    /// Target branch.
    pub base: PrBranchRef,
    /// Whether the pull request is a draft.
    #[serde(default)]
    pub draft: bool,
    /// Author, absent for some integration-created pull requests.
    #[serde(default)]
    pub user: Option<PrUser>,
}

/// Request body for creating a pull request.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePrRequest {
    /// Pull request title.
    pub title: String,
    /// Source branch name.
    pub head: String,
    /// Target branch name.
    pub base: String,
    /// Markdown body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Open the pull request as a draft.
    pub draft: bool,
}

/// State filter accepted by the list pull requests endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrStateFilter {
    /// Open pull requests only.
    #[default]
    Open,
    /// Closed and merged pull requests.
    Closed,
    /// All pull requests regardless of state.
    All,
}

impl PrStateFilter {
    /// Query-parameter value for the REST API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

impl std::str::FromStr for PrStateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "all" => Ok(Self::All),
            other => Err(format!(
                "invalid pull request state '{other}' (expected open, closed or all)"
            )),
        }
    }
}

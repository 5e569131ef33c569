//! Parameter schemas for the MCP tools.
//!
//! Doc comments on fields become the `description` entries in the
//! generated JSON schemas.

use schemars::JsonSchema;
use serde::Deserialize;

/// Parameters for `validate_branch_name`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ValidateBranchNameRequest {
    /// Branch name to validate, e.g. `feature/PROJ-123-user-authentication`.
    pub name: String,
}

/// Parameters for `generate_branch_name`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateBranchNameRequest {
    /// Branch type, one of the configured types such as `feature` or `bugfix`.
    pub branch_type: String,
    /// Free-form description, slugified into the branch name.
    pub description: String,
    /// Linear issue identifier to embed, e.g. `PROJ-123`.
    pub issue_id: Option<String>,
}

/// Parameters for `validate_commit_message`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ValidateCommitMessageRequest {
    /// Commit message to validate. Only the first line is checked.
    pub message: String,
}

/// Parameters for `generate_commit_message`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateCommitMessageRequest {
    /// Commit type, one of the configured types such as `feat` or `fix`.
    pub commit_type: String,
    /// Subject line content.
    pub subject: String,
    /// Optional scope, e.g. the component the change touches.
    pub scope: Option<String>,
}

/// Parameters for `linear_create_issue`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LinearCreateIssueRequest {
    /// Team key the issue belongs to, e.g. `PROJ`.
    pub team: String,
    /// Issue title.
    pub title: String,
    /// Optional markdown body.
    pub description: Option<String>,
    /// Workflow state name to start in, e.g. `Todo`.
    pub state: Option<String>,
    /// Label names to attach.
    pub labels: Option<Vec<String>>,
}

/// Parameters for `linear_list_issues`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LinearListIssuesRequest {
    /// Team key to list issues for.
    pub team: String,
    /// Workflow state name to filter by, e.g. `In Progress`.
    pub state: Option<String>,
    /// Maximum number of issues to return, defaults to 50.
    pub limit: Option<u32>,
}

/// Parameters for `linear_get_issue`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LinearGetIssueRequest {
    /// Issue identifier in `TEAM-123` form.
    pub identifier: String,
}

/// Parameters for `linear_update_issue`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LinearUpdateIssueRequest {
    /// Issue identifier in `TEAM-123` form.
    pub identifier: String,
    /// New title.
    pub title: Option<String>,
    /// New markdown body.
    pub description: Option<String>,
    /// Workflow state name to move the issue to.
    pub state: Option<String>,
}

/// Parameters for the tools that operate on one Linear team.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LinearTeamRequest {
    /// Team key, e.g. `PROJ`.
    pub team: String,
}

/// Parameters for the GitHub tools that only need a repository.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GithubRepoRequest {
    /// Repository name within the configured organization. Defaults to
    /// the `DEFAULT_REPO` setting.
    pub repo: Option<String>,
}

/// Parameters for `github_create_branch`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GithubCreateBranchRequest {
    /// Branch name to create. Must pass branch name validation.
    pub branch_name: String,
    /// Repository name, defaults to the `DEFAULT_REPO` setting.
    pub repo: Option<String>,
    /// Branch to fork from, defaults to the repository's default branch.
    pub base_branch: Option<String>,
}

/// Parameters for `github_list_pull_requests`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GithubListPullRequestsRequest {
    /// Repository name, defaults to the `DEFAULT_REPO` setting.
    pub repo: Option<String>,
    /// State filter: `open`, `closed` or `all`. Defaults to `open`.
    pub state: Option<String>,
}

/// Parameters for `github_create_pull_request`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GithubCreatePullRequestRequest {
    /// Pull request title. Must pass commit message validation.
    pub title: String,
    /// Source branch name.
    pub head: String,
    /// Target branch, defaults to the repository's default branch.
    pub base: Option<String>,
    /// Markdown body.
    pub body: Option<String>,
    /// Repository name, defaults to the `DEFAULT_REPO` setting.
    pub repo: Option<String>,
    /// Open as a draft pull request.
    pub draft: Option<bool>,
}

//! MCP service wiring the convention engines to the Linear and GitHub
//! backends.
//!
//! Convention tools run entirely in-process. Backend-facing tools load
//! settings and construct their client on first use, so a missing
//! credential only fails the tools that need it.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Serialize;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::debug;

use super::params::{
    GenerateBranchNameRequest, GenerateCommitMessageRequest, GithubCreateBranchRequest,
    GithubCreatePullRequestRequest, GithubListPullRequestsRequest, GithubRepoRequest,
    LinearCreateIssueRequest, LinearGetIssueRequest, LinearListIssuesRequest, LinearTeamRequest,
    LinearUpdateIssueRequest, ValidateBranchNameRequest, ValidateCommitMessageRequest,
};
use crate::config::Settings;
use crate::conventions::{BranchNameEngine, CommitMessageEngine, ConventionCatalog, IssueRef};
use crate::github::{CreatePrRequest, GitHubClient, PrStateFilter};
use crate::linear::models::{CreateIssueInput, UpdateIssueInput};
use crate::linear::{LinearError, WorkspaceRegistry};

/// GitHub client plus the default repository it falls back to.
struct GitHubBackend {
    client: GitHubClient,
    default_repo: String,
}

/// MCP service exposing the convention, Linear and GitHub tool set.
#[derive(Clone)]
pub struct ArcFlowService {
    catalog: Arc<ConventionCatalog>,
    linear: Arc<OnceCell<WorkspaceRegistry>>,
    github: Arc<OnceCell<GitHubBackend>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ArcFlowService {
    /// Create a service backed by the standard convention catalog.
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(ConventionCatalog::standard()),
            linear: Arc::new(OnceCell::new()),
            github: Arc::new(OnceCell::new()),
            tool_router: Self::tool_router(),
        }
    }

    // ── convention tools ─────────────────────────────────────────────

    #[tool(description = "Validate a git branch name against the naming convention. \
        Returns the parsed components when valid, or the error and fix \
        suggestions when not.")]
    fn validate_branch_name(
        &self,
        Parameters(request): Parameters<ValidateBranchNameRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = BranchNameEngine::new(&self.catalog).validate(&request.name);
        json_result(&result)
    }

    #[tool(description = "Generate a convention-compliant branch name from a branch \
        type, a description and an optional Linear issue id.")]
    fn generate_branch_name(
        &self,
        Parameters(request): Parameters<GenerateBranchNameRequest>,
    ) -> Result<CallToolResult, McpError> {
        let issue = match request.issue_id.as_deref().map(str::parse::<IssueRef>) {
            Some(Ok(issue)) => Some(issue),
            Some(Err(error)) => return json_error(&error),
            None => None,
        };
        let engine = BranchNameEngine::new(&self.catalog);
        match engine.generate(&request.branch_type, &request.description, issue.as_ref()) {
            Ok(name) => json_result(&json!({ "branch_name": name })),
            Err(error) => json_error(&error),
        }
    }

    #[tool(description = "Validate a commit message header against the conventional \
        commit format. Returns the parsed components when valid, or the \
        error and fix suggestions when not.")]
    fn validate_commit_message(
        &self,
        Parameters(request): Parameters<ValidateCommitMessageRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result = CommitMessageEngine::new(&self.catalog).validate(&request.message);
        json_result(&result)
    }

    #[tool(description = "Generate a conventional commit message from a commit type, \
        a subject and an optional scope.")]
    fn generate_commit_message(
        &self,
        Parameters(request): Parameters<GenerateCommitMessageRequest>,
    ) -> Result<CallToolResult, McpError> {
        let engine = CommitMessageEngine::new(&self.catalog);
        match engine.generate(
            &request.commit_type,
            &request.subject,
            request.scope.as_deref(),
        ) {
            Ok(message) => json_result(&json!({ "commit_message": message })),
            Err(error) => json_error(&error),
        }
    }

    #[tool(description = "Describe the branch and commit naming conventions, with \
        the accepted types and examples.")]
    fn get_naming_conventions(&self) -> Result<CallToolResult, McpError> {
        json_result(&self.catalog.guide())
    }

    // ── Linear tools ─────────────────────────────────────────────────

    #[tool(description = "List configured Linear workspaces and the teams in each.")]
    async fn linear_list_workspaces(&self) -> Result<CallToolResult, McpError> {
        let registry = self.registry().await?;
        let workspaces = registry.workspaces_with_teams().await;
        json_result(&json!({ "workspaces": workspaces }))
    }

    #[tool(description = "Create a Linear issue in a team, optionally setting the \
        initial workflow state and labels by name.")]
    async fn linear_create_issue(
        &self,
        Parameters(request): Parameters<LinearCreateIssueRequest>,
    ) -> Result<CallToolResult, McpError> {
        let registry = self.registry().await?;
        let team = request.team.to_uppercase();
        let client = registry.client_for_team(&team).await.map_err(invalid_params)?;

        let state_id = match request.state.as_deref() {
            Some(name) => Some(
                client
                    .resolve_state_id(&team, name)
                    .await
                    .map_err(lookup_error)?,
            ),
            None => None,
        };
        let label_ids = match request.labels.as_deref() {
            Some(names) if !names.is_empty() => client
                .resolve_label_ids(&team, names)
                .await
                .map_err(lookup_error)?,
            _ => Vec::new(),
        };

        let input = CreateIssueInput {
            team,
            title: request.title,
            description: request.description,
            priority: None,
            state_id,
            label_ids,
        };
        let issue = client.create_issue(&input).await.map_err(internal_error)?;
        json_result(&issue)
    }

    #[tool(description = "List Linear issues for a team, optionally filtered by \
        workflow state name.")]
    async fn linear_list_issues(
        &self,
        Parameters(request): Parameters<LinearListIssuesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let registry = self.registry().await?;
        let team = request.team.to_uppercase();
        let client = registry.client_for_team(&team).await.map_err(invalid_params)?;
        let issues = client
            .list_issues(&team, request.state.as_deref(), request.limit)
            .await
            .map_err(internal_error)?;
        json_result(&issues)
    }

    #[tool(description = "Fetch a Linear issue by its identifier, e.g. PROJ-123.")]
    async fn linear_get_issue(
        &self,
        Parameters(request): Parameters<LinearGetIssueRequest>,
    ) -> Result<CallToolResult, McpError> {
        let registry = self.registry().await?;
        let client = registry
            .client_for_issue(&request.identifier)
            .await
            .map_err(invalid_params)?;
        let issue = client
            .get_issue(&request.identifier)
            .await
            .map_err(internal_error)?;
        json_result(&issue)
    }

    #[tool(description = "Update a Linear issue's title, description or workflow \
        state (by state name).")]
    async fn linear_update_issue(
        &self,
        Parameters(request): Parameters<LinearUpdateIssueRequest>,
    ) -> Result<CallToolResult, McpError> {
        let registry = self.registry().await?;
        let client = registry
            .client_for_issue(&request.identifier)
            .await
            .map_err(invalid_params)?;

        let state_id = match request.state.as_deref() {
            Some(name) => {
                // Identifier format was already checked by the registry.
                let team = request
                    .identifier
                    .split('-')
                    .next()
                    .unwrap_or_default()
                    .to_uppercase();
                Some(
                    client
                        .resolve_state_id(&team, name)
                        .await
                        .map_err(lookup_error)?,
                )
            }
            None => None,
        };

        let input = UpdateIssueInput {
            title: request.title,
            description: request.description,
            priority: None,
            state_id,
            label_ids: None,
        };
        if input.is_empty() {
            return Err(McpError::invalid_params(
                "No fields to update: set at least one of title, description or state",
                None,
            ));
        }

        let issue = client
            .update_issue(&request.identifier, &input)
            .await
            .map_err(internal_error)?;
        json_result(&issue)
    }

    #[tool(description = "List the workflow states configured for a Linear team.")]
    async fn linear_list_states(
        &self,
        Parameters(request): Parameters<LinearTeamRequest>,
    ) -> Result<CallToolResult, McpError> {
        let registry = self.registry().await?;
        let team = request.team.to_uppercase();
        let client = registry.client_for_team(&team).await.map_err(invalid_params)?;
        let states = client
            .list_workflow_states(&team)
            .await
            .map_err(internal_error)?;
        json_result(&states)
    }

    #[tool(description = "List the labels available to a Linear team.")]
    async fn linear_list_labels(
        &self,
        Parameters(request): Parameters<LinearTeamRequest>,
    ) -> Result<CallToolResult, McpError> {
        let registry = self.registry().await?;
        let team = request.team.to_uppercase();
        let client = registry.client_for_team(&team).await.map_err(invalid_params)?;
        let labels = client.list_labels(&team).await.map_err(internal_error)?;
        json_result(&labels)
    }

    // ── GitHub tools ─────────────────────────────────────────────────

    #[tool(description = "Get the default branch of a GitHub repository.")]
    async fn github_get_default_branch(
        &self,
        Parameters(request): Parameters<GithubRepoRequest>,
    ) -> Result<CallToolResult, McpError> {
        let backend = self.github_backend().await?;
        let repo = backend.repo_or_default(request.repo);
        let branch = backend
            .client
            .get_default_branch(&repo)
            .await
            .map_err(internal_error)?;
        json_result(&json!({ "repository": repo, "default_branch": branch }))
    }

    #[tool(description = "List the branches of a GitHub repository.")]
    async fn github_list_branches(
        &self,
        Parameters(request): Parameters<GithubRepoRequest>,
    ) -> Result<CallToolResult, McpError> {
        let backend = self.github_backend().await?;
        let repo = backend.repo_or_default(request.repo);
        let branches = backend
            .client
            .list_branches(&repo)
            .await
            .map_err(internal_error)?;
        json_result(&branches)
    }

    #[tool(description = "Create a GitHub branch. The branch name is validated \
        against the naming convention first; non-compliant names are \
        rejected with suggestions and no branch is created.")]
    async fn github_create_branch(
        &self,
        Parameters(request): Parameters<GithubCreateBranchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let validation = BranchNameEngine::new(&self.catalog).validate(&request.branch_name);
        if !validation.is_valid {
            debug!(branch = %request.branch_name, "Rejected non-compliant branch name");
            return json_error(&validation);
        }

        let backend = self.github_backend().await?;
        let repo = backend.repo_or_default(request.repo);
        let base = match request.base_branch {
            Some(base) => base,
            None => backend
                .client
                .get_default_branch(&repo)
                .await
                .map_err(internal_error)?,
        };
        let sha = backend
            .client
            .get_branch_sha(&repo, &base)
            .await
            .map_err(internal_error)?;
        let git_ref = backend
            .client
            .create_branch(&repo, &request.branch_name, &sha)
            .await
            .map_err(internal_error)?;
        json_result(&git_ref)
    }

    #[tool(description = "List pull requests of a GitHub repository, filtered by \
        state: open, closed or all.")]
    async fn github_list_pull_requests(
        &self,
        Parameters(request): Parameters<GithubListPullRequestsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let state = match request.state.as_deref() {
            Some(raw) => raw
                .parse::<PrStateFilter>()
                .map_err(|e| McpError::invalid_params(e, None))?,
            None => PrStateFilter::default(),
        };

        let backend = self.github_backend().await?;
        let repo = backend.repo_or_default(request.repo);
        let pull_requests = backend
            .client
            .list_pull_requests(&repo, state)
            .await
            .map_err(internal_error)?;
        json_result(&pull_requests)
    }

    #[tool(description = "Open a GitHub pull request. The title is validated \
        against the commit message convention first; non-compliant titles \
        are rejected with suggestions and no pull request is created.")]
    async fn github_create_pull_request(
        &self,
        Parameters(request): Parameters<GithubCreatePullRequestRequest>,
    ) -> Result<CallToolResult, McpError> {
        let validation = CommitMessageEngine::new(&self.catalog).validate(&request.title);
        if !validation.is_valid {
            debug!(title = %request.title, "Rejected non-compliant pull request title");
            return json_error(&validation);
        }

        let backend = self.github_backend().await?;
        let repo = backend.repo_or_default(request.repo);
        let base = match request.base {
            Some(base) => base,
            None => backend
                .client
                .get_default_branch(&repo)
                .await
                .map_err(internal_error)?,
        };

        let pr_request = CreatePrRequest {
            title: request.title,
            head: request.head,
            base,
            body: request.body,
            draft: request.draft.unwrap_or(false),
        };
        let pull_request = backend
            .client
            .create_pull_request(&repo, &pr_request)
            .await
            .map_err(internal_error)?;
        json_result(&pull_request)
    }

    // ── lazy backends ────────────────────────────────────────────────

    async fn registry(&self) -> Result<&WorkspaceRegistry, McpError> {
        self.linear
            .get_or_try_init(|| async {
                let settings = Settings::load().map_err(internal_error)?;
                WorkspaceRegistry::from_settings(&settings).map_err(internal_error)
            })
            .await
    }

    async fn github_backend(&self) -> Result<&GitHubBackend, McpError> {
        self.github
            .get_or_try_init(|| async {
                let settings = Settings::load().map_err(internal_error)?;
                let client = GitHubClient::new(
                    &settings.github_token,
                    &settings.github_api_url,
                    &settings.github_org,
                    settings.request_timeout,
                )
                .map_err(internal_error)?;
                Ok(GitHubBackend {
                    client,
                    default_repo: settings.default_repo,
                })
            })
            .await
    }
}

impl Default for ArcFlowService {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHubBackend {
    fn repo_or_default(&self, repo: Option<String>) -> String {
        repo.unwrap_or_else(|| self.default_repo.clone())
    }
}

#[tool_handler]
impl ServerHandler for ArcFlowService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "Bridges Linear issue tracking and GitHub source hosting with a \
                 shared naming convention. Use validate_branch_name, \
                 generate_branch_name, validate_commit_message, \
                 generate_commit_message and get_naming_conventions to work with \
                 names, linear_* tools to manage issues across workspaces, and \
                 github_* tools to manage branches and pull requests. \
                 github_create_branch and github_create_pull_request validate \
                 names first and refuse non-compliant input."
                    .to_string(),
            )
    }
}

// --- Extracted pure functions ---

/// Serialize a payload as a successful tool result.
fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Serialize a payload as a failed tool result, keeping the detail
/// available to the caller instead of raising a protocol error.
fn json_error<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::error(vec![Content::text(text)]))
}

/// Caller-correctable routing and lookup failures.
fn invalid_params(e: impl std::fmt::Display) -> McpError {
    McpError::invalid_params(e.to_string(), None)
}

/// Backend failures the caller cannot address directly.
fn internal_error(e: impl std::fmt::Display) -> McpError {
    McpError::internal_error(e.to_string(), None)
}

/// Name-to-id lookups: an unknown name is the caller's to fix, anything
/// else is a backend failure.
fn lookup_error(e: LinearError) -> McpError {
    match e {
        LinearError::NotFound(_) => invalid_params(e),
        other => internal_error(other),
    }
}

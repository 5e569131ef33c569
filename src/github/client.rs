//! Organization-scoped GitHub REST client.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::error::GitHubError;
use super::models::{
    Branch, CreatePrRequest, GitRef, PrStateFilter, PullRequest, Repository,
};

/// User agent sent with every request.
const USER_AGENT_VALUE: &str = concat!("arc-flow/", env!("CARGO_PKG_VERSION"));

/// REST API version pinned for stable response shapes.
const API_VERSION: &str = "2022-11-28";

/// Client for repositories under a single GitHub organization.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
    org: String,
}

impl GitHubClient {
    /// Create a client for one organization.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::Config` if the token contains characters that
    /// cannot appear in an HTTP header or the HTTP client cannot be
    /// constructed.
    pub fn new(
        token: &str,
        api_url: impl Into<String>,
        org: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GitHubError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            GitHubError::Config("token contains characters not valid in a header".to_string())
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| GitHubError::Config(e.to_string()))?;

        Ok(Self {
            client,
            api_url: trim_trailing_slash(api_url.into()),
            org: org.into(),
        })
    }

    /// Organization this client is scoped to.
    pub fn org(&self) -> &str {
        &self.org
    }

    /// Fetch repository metadata, including its default branch.
    pub async fn get_repository(&self, repo: &str) -> Result<Repository, GitHubError> {
        let url = self.repo_url(repo, "");
        self.get(&url).await
    }

    /// Name of the repository's default branch.
    pub async fn get_default_branch(&self, repo: &str) -> Result<String, GitHubError> {
        Ok(self.get_repository(repo).await?.default_branch)
    }

    /// List the branches of a repository.
    pub async fn list_branches(&self, repo: &str) -> Result<Vec<Branch>, GitHubError> {
        let url = self.repo_url(repo, "branches");
        self.get(&url).await
    }

    /// Tip commit SHA of a branch.
    pub async fn get_branch_sha(&self, repo: &str, branch: &str) -> Result<String, GitHubError> {
        let url = self.repo_url(repo, &format!("git/ref/heads/{branch}"));
        let git_ref: GitRef = self.get(&url).await?;
        Ok(git_ref.object.sha)
    }

    /// Create a branch pointing at `from_sha`.
    pub async fn create_branch(
        &self,
        repo: &str,
        name: &str,
        from_sha: &str,
    ) -> Result<GitRef, GitHubError> {
        let url = self.repo_url(repo, "git/refs");
        let body = json!({
            "ref": format!("refs/heads/{name}"),
            "sha": from_sha,
        });
        debug!(repo = %repo, branch = %name, sha = %from_sha, "Creating GitHub branch");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GitHubError::NetworkError(e.to_string()))?;
        self.handle_response(response).await
    }

    /// List pull requests filtered by state.
    pub async fn list_pull_requests(
        &self,
        repo: &str,
        state: PrStateFilter,
    ) -> Result<Vec<PullRequest>, GitHubError> {
        let url = self.repo_url(repo, "pulls");
        let response = self
            .client
            .get(&url)
            .query(&[("state", state.as_str())])
            .send()
            .await
            .map_err(|e| GitHubError::NetworkError(e.to_string()))?;
        self.handle_response(response).await
    }

    /// Open a pull request.
    pub async fn create_pull_request(
        &self,
        repo: &str,
        request: &CreatePrRequest,
    ) -> Result<PullRequest, GitHubError> {
        let url = self.repo_url(repo, "pulls");
        debug!(
            repo = %repo,
            head = %request.head,
            base = %request.base,
            "Creating GitHub pull request"
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| GitHubError::NetworkError(e.to_string()))?;
        self.handle_response(response).await
    }

    /// Build a URL for a repository endpoint.
    fn repo_url(&self, repo: &str, path: &str) -> String {
        if path.is_empty() {
            format!("{}/repos/{}/{}", self.api_url, self.org, repo)
        } else {
            format!("{}/repos/{}/{}/{}", self.api_url, self.org, repo, path)
        }
    }

    /// GET a URL and deserialize the response body.
    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, GitHubError> {
        debug!(url = %url, "Sending GitHub API request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GitHubError::NetworkError(e.to_string()))?;
        self.handle_response(response).await
    }

    /// Map a response to a typed value or the matching error variant.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, GitHubError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| GitHubError::InvalidResponse(e.to_string()));
        }

        let message = response
            .json::<GitHubErrorBody>()
            .await
            .map(|e| e.message)
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(match status {
            StatusCode::UNAUTHORIZED => GitHubError::AuthFailed("invalid or expired token".to_string()),
            StatusCode::FORBIDDEN => GitHubError::AuthFailed(message),
            StatusCode::NOT_FOUND => GitHubError::NotFound(message),
            StatusCode::UNPROCESSABLE_ENTITY => GitHubError::ValidationFailed(message),
            _ => GitHubError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }
}

/// Error body shape used by the GitHub API.
#[derive(Deserialize)]
struct GitHubErrorBody {
    message: String,
}

// --- Extracted pure functions ---

/// Drop a trailing slash so path joins do not produce `//`.
fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GitHubClient {
        GitHubClient::new(
            "ghp_testtoken",
            "https://api.github.com",
            "arc-apps",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    // ── construction ─────────────────────────────────────────────────

    #[test]
    fn constructor_rejects_token_with_control_characters() {
        let err = GitHubClient::new(
            "bad\ntoken",
            "https://api.github.com",
            "arc-apps",
            Duration::from_secs(5),
        )
        .unwrap_err();
        assert!(matches!(err, GitHubError::Config(_)));
    }

    #[test]
    fn org_accessor_returns_configured_org() {
        assert_eq!(client().org(), "arc-apps");
    }

    // ── url construction ─────────────────────────────────────────────

    #[test]
    fn repo_url_without_path() {
        assert_eq!(
            client().repo_url("mobile-app", ""),
            "https://api.github.com/repos/arc-apps/mobile-app"
        );
    }

    #[test]
    fn repo_url_with_nested_path() {
        assert_eq!(
            client().repo_url("mobile-app", "git/ref/heads/main"),
            "https://api.github.com/repos/arc-apps/mobile-app/git/ref/heads/main"
        );
    }

    #[test]
    fn trailing_slash_in_api_url_is_trimmed() {
        let client = GitHubClient::new(
            "ghp_testtoken",
            "https://github.example.com/api/v3/",
            "arc-apps",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.repo_url("app", "branches"),
            "https://github.example.com/api/v3/repos/arc-apps/app/branches"
        );
    }
}

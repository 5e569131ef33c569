//! GitHub-specific error handling.

use thiserror::Error;

/// GitHub API specific errors.
#[derive(Error, Debug)]
pub enum GitHubError {
    /// Token was rejected or lacks the required scopes.
    #[error("GitHub authentication failed: {0}")]
    AuthFailed(String),

    /// Requested repository, branch or ref does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request was well-formed but rejected, e.g. a branch that already
    /// exists or a pull request with no commits between head and base.
    #[error("GitHub rejected the request: {0}")]
    ValidationFailed(String),

    /// Request reached GitHub but came back with a non-success status.
    #[error("GitHub API error ({status}): {message}")]
    ApiError {
        /// HTTP status code returned by the API.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// Network connectivity error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Response body did not match the expected shape.
    #[error("Invalid response from GitHub API: {0}")]
    InvalidResponse(String),

    /// Client-side configuration problem.
    #[error("GitHub client configuration error: {0}")]
    Config(String),
}

// Note: anyhow already has a blanket impl for thiserror::Error types

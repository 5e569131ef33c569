//! Linear-specific error handling.

use thiserror::Error;

/// Linear API specific errors.
#[derive(Error, Debug)]
pub enum LinearError {
    /// API key was rejected by Linear.
    #[error("Linear authentication failed: {0}")]
    AuthFailed(String),

    /// Request reached Linear but came back with a non-success status.
    #[error("Linear API error ({status}): {message}")]
    ApiError {
        /// HTTP status code returned by the API.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// GraphQL-level error returned in an otherwise successful response.
    #[error("Linear GraphQL error: {0}")]
    Api(String),

    /// Requested entity does not exist in this workspace.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body did not match the expected shape.
    #[error("Invalid response from Linear API: {0}")]
    InvalidResponse(String),

    /// Network connectivity error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Client-side configuration problem.
    #[error("Linear client configuration error: {0}")]
    Config(String),
}

// Note: anyhow already has a blanket impl for thiserror::Error types

//! GitHub API integration.
//!
//! REST client scoped to a single organization, covering the repository,
//! branch and pull request operations the automation layer needs.

pub mod client;
pub mod error;
pub mod models;

pub use client::GitHubClient;
pub use error::GitHubError;
pub use models::{
    Branch, CommitRef, CreatePrRequest, GitRef, PrStateFilter, PullRequest, Repository,
};

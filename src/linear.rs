//! Linear API integration.
//!
//! Talks to Linear's GraphQL API and multiplexes requests across
//! configured workspaces. [`client::LinearClient`] is a thin single
//! workspace client; [`registry::WorkspaceRegistry`] routes team keys
//! and issue identifiers to the right client.

pub mod client;
pub mod error;
pub mod models;
pub mod registry;

pub use client::LinearClient;
pub use error::LinearError;
pub use models::{CreateIssueInput, Issue, IssueLabel, Team, UpdateIssueInput, WorkflowState};
pub use registry::{RegistryError, WorkspaceRegistry, WorkspaceTeams};

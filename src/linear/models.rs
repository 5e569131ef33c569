//! Wire types for the Linear GraphQL API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Linear team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Opaque team id used by mutations.
    pub id: String,
    /// Short uppercase key, the `TEAM` in `TEAM-123`.
    pub key: String,
    /// Human-readable team name.
    pub name: String,
}

/// A workflow state within a team (e.g. "In Progress").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    /// Opaque state id.
    pub id: String,
    /// Display name of the state.
    pub name: String,
    /// State category such as `backlog`, `started` or `completed`.
    #[serde(rename = "type")]
    pub state_type: String,
}

/// A label that can be attached to issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLabel {
    /// Opaque label id.
    pub id: String,
    /// Label name.
    pub name: String,
    /// Hex color assigned in Linear.
    pub color: String,
}

/// Minimal user reference as embedded in issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque user id.
    pub id: String,
    /// Full name of the user.
    pub name: String,
}

/// A Linear issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Opaque issue id used by mutations.
    pub id: String,
    /// Human-readable identifier like `PROJ-123`.
    pub identifier: String,
    /// Issue title.
    pub title: String,
    /// Markdown body, absent when the issue has none.
    pub description: Option<String>,
    /// Browser URL of the issue.
    pub url: String,
    /// Current workflow state.
    pub state: Option<WorkflowState>,
    /// Assigned user, if any.
    pub assignee: Option<User>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a new issue.
///
/// The `team` field carries the team key; the client resolves it to a
/// team id before issuing the mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateIssueInput {
    /// Team key the issue belongs to (e.g. `PROJ`).
    pub team: String,
    /// Issue title.
    pub title: String,
    /// Optional markdown body.
    pub description: Option<String>,
    /// Priority from 0 (none) to 4 (low).
    pub priority: Option<u8>,
    /// Workflow state id to start in, defaults to the team's default state.
    pub state_id: Option<String>,
    /// Label ids to attach.
    #[serde(default)]
    pub label_ids: Vec<String>,
}

/// Fields for updating an existing issue. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIssueInput {
    /// New title.
    pub title: Option<String>,
    /// New markdown body.
    pub description: Option<String>,
    /// New priority from 0 (none) to 4 (low).
    pub priority: Option<u8>,
    /// Workflow state id to move the issue to.
    pub state_id: Option<String>,
    /// Replacement set of label ids.
    pub label_ids: Option<Vec<String>>,
}

impl UpdateIssueInput {
    /// True when no field is set, i.e. the update would be a no-op.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.state_id.is_none()
            && self.label_ids.is_none()
    }
}

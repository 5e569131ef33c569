//! Single-workspace Linear GraphQL client.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::error::LinearError;
use super::models::{CreateIssueInput, Issue, IssueLabel, Team, UpdateIssueInput, WorkflowState};

/// Issue fields requested by every query that returns issues.
const ISSUE_FIELDS: &str = "id identifier title description url \
     state { id name type } assignee { id name } createdAt updatedAt";

/// Page size used by `list_issues` when the caller passes no limit.
pub const DEFAULT_ISSUE_LIMIT: u32 = 50;

/// Client for a single Linear workspace.
///
/// Linear authenticates personal API keys through a bare `Authorization`
/// header, without a `Bearer` prefix. The key is stored inside the
/// underlying HTTP client as a sensitive default header so it never shows
/// up in debug output.
#[derive(Debug, Clone)]
pub struct LinearClient {
    client: Client,
    api_url: String,
}

impl LinearClient {
    /// Create a client for one workspace.
    ///
    /// # Errors
    ///
    /// Returns `LinearError::Config` if the API key contains characters
    /// that cannot appear in an HTTP header or the HTTP client cannot be
    /// constructed.
    pub fn new(
        api_key: &str,
        api_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LinearError> {
        let mut auth = HeaderValue::from_str(api_key).map_err(|_| {
            LinearError::Config("API key contains characters not valid in a header".to_string())
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| LinearError::Config(e.to_string()))?;

        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    /// GraphQL endpoint this client talks to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// List all teams in the workspace.
    pub async fn list_teams(&self) -> Result<Vec<Team>, LinearError> {
        let query = "query Teams { teams { nodes { id key name } } }";
        let data: TeamsData = self.graphql(query, json!({})).await?;
        Ok(data.teams.nodes)
    }

    /// Look up a team by its key (e.g. `PROJ`). Returns `None` when the
    /// workspace has no such team.
    pub async fn get_team_by_key(&self, key: &str) -> Result<Option<Team>, LinearError> {
        let query = "query TeamByKey($key: String!) { \
             teams(filter: { key: { eq: $key } }) { nodes { id key name } } }";
        let data: TeamsData = self.graphql(query, json!({ "key": key })).await?;
        Ok(data.teams.nodes.into_iter().next())
    }

    /// Create an issue. The team key in `input` is resolved to a team id
    /// before the mutation runs.
    pub async fn create_issue(&self, input: &CreateIssueInput) -> Result<Issue, LinearError> {
        let team = self
            .get_team_by_key(&input.team)
            .await?
            .ok_or_else(|| LinearError::NotFound(format!("Team '{}'", input.team)))?;

        let mut mutation_input = json!({ "teamId": team.id, "title": input.title });
        if let Some(ref description) = input.description {
            mutation_input["description"] = json!(description);
        }
        if let Some(priority) = input.priority {
            mutation_input["priority"] = json!(priority);
        }
        if let Some(ref state_id) = input.state_id {
            mutation_input["stateId"] = json!(state_id);
        }
        if !input.label_ids.is_empty() {
            mutation_input["labelIds"] = json!(input.label_ids);
        }

        let query = format!(
            "mutation CreateIssue($input: IssueCreateInput!) {{ \
             issueCreate(input: $input) {{ success issue {{ {ISSUE_FIELDS} }} }} }}"
        );
        debug!(team = %input.team, title = %input.title, "Creating Linear issue");
        let data: IssueCreateData = self
            .graphql(&query, json!({ "input": mutation_input }))
            .await?;
        issue_from_mutation(data.issue_create, "issueCreate")
    }

    /// List issues for a team, optionally filtered by workflow state name.
    ///
    /// `limit` caps the page size and defaults to [`DEFAULT_ISSUE_LIMIT`].
    pub async fn list_issues(
        &self,
        team_key: &str,
        state: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Issue>, LinearError> {
        let mut filter = json!({ "team": { "key": { "eq": team_key } } });
        if let Some(state) = state {
            filter["state"] = json!({ "name": { "eq": state } });
        }

        let query = format!(
            "query Issues($filter: IssueFilter, $first: Int!) {{ \
             issues(filter: $filter, first: $first) {{ nodes {{ {ISSUE_FIELDS} }} }} }}"
        );
        let variables = json!({
            "filter": filter,
            "first": limit.unwrap_or(DEFAULT_ISSUE_LIMIT),
        });
        let data: IssuesData = self.graphql(&query, variables).await?;
        Ok(data.issues.nodes)
    }

    /// Fetch a single issue by identifier (`TEAM-123`).
    ///
    /// # Errors
    ///
    /// Returns `LinearError::NotFound` when the workspace has no issue
    /// with that identifier.
    pub async fn get_issue(&self, identifier: &str) -> Result<Issue, LinearError> {
        let query =
            format!("query Issue($id: String!) {{ issue(id: $id) {{ {ISSUE_FIELDS} }} }}");
        let data: IssueData = self.graphql(&query, json!({ "id": identifier })).await?;
        data.issue
            .ok_or_else(|| LinearError::NotFound(format!("Issue '{identifier}'")))
    }

    /// Update an issue identified by `TEAM-123`. The identifier is first
    /// resolved to the opaque issue id the mutation requires.
    pub async fn update_issue(
        &self,
        identifier: &str,
        input: &UpdateIssueInput,
    ) -> Result<Issue, LinearError> {
        let existing = self.get_issue(identifier).await?;

        let mut mutation_input = json!({});
        if let Some(ref title) = input.title {
            mutation_input["title"] = json!(title);
        }
        if let Some(ref description) = input.description {
            mutation_input["description"] = json!(description);
        }
        if let Some(priority) = input.priority {
            mutation_input["priority"] = json!(priority);
        }
        if let Some(ref state_id) = input.state_id {
            mutation_input["stateId"] = json!(state_id);
        }
        if let Some(ref label_ids) = input.label_ids {
            mutation_input["labelIds"] = json!(label_ids);
        }

        let query = format!(
            "mutation UpdateIssue($id: String!, $input: IssueUpdateInput!) {{ \
             issueUpdate(id: $id, input: $input) {{ success issue {{ {ISSUE_FIELDS} }} }} }}"
        );
        debug!(identifier = %identifier, "Updating Linear issue");
        let data: IssueUpdateData = self
            .graphql(&query, json!({ "id": existing.id, "input": mutation_input }))
            .await?;
        issue_from_mutation(data.issue_update, "issueUpdate")
    }

    /// List the workflow states configured for a team.
    pub async fn list_workflow_states(
        &self,
        team_key: &str,
    ) -> Result<Vec<WorkflowState>, LinearError> {
        let query = "query States($key: String!) { \
             workflowStates(filter: { team: { key: { eq: $key } } }) { \
             nodes { id name type } } }";
        let data: StatesData = self.graphql(query, json!({ "key": team_key })).await?;
        Ok(data.workflow_states.nodes)
    }

    /// List the labels available to a team.
    pub async fn list_labels(&self, team_key: &str) -> Result<Vec<IssueLabel>, LinearError> {
        let query = "query Labels($key: String!) { \
             issueLabels(filter: { team: { key: { eq: $key } } }) { \
             nodes { id name color } } }";
        let data: LabelsData = self.graphql(query, json!({ "key": team_key })).await?;
        Ok(data.issue_labels.nodes)
    }

    /// Resolve a workflow state name to its id within a team. Matching is
    /// case-insensitive.
    pub async fn resolve_state_id(
        &self,
        team_key: &str,
        name: &str,
    ) -> Result<String, LinearError> {
        let states = self.list_workflow_states(team_key).await?;
        states
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(|s| s.id.clone())
            .ok_or_else(|| {
                let available = states
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                LinearError::NotFound(format!(
                    "Workflow state '{name}' for team {team_key}. Available: {available}"
                ))
            })
    }

    /// Resolve label names to ids within a team. Matching is
    /// case-insensitive; any unknown name fails the whole lookup.
    pub async fn resolve_label_ids(
        &self,
        team_key: &str,
        names: &[String],
    ) -> Result<Vec<String>, LinearError> {
        let labels = self.list_labels(team_key).await?;
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let label = labels
                .iter()
                .find(|l| l.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    let available = labels
                        .iter()
                        .map(|l| l.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    LinearError::NotFound(format!(
                        "Label '{name}' for team {team_key}. Available: {available}"
                    ))
                })?;
            ids.push(label.id.clone());
        }
        Ok(ids)
    }

    /// Execute one GraphQL request and deserialize the `data` payload.
    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, LinearError> {
        let body = json!({ "query": query, "variables": variables });
        debug!(url = %self.api_url, "Sending Linear GraphQL request");

        let response = self
            .client
            .post(&self.api_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LinearError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED => {
                    LinearError::AuthFailed("invalid or expired API key".to_string())
                }
                StatusCode::FORBIDDEN => LinearError::AuthFailed("permission denied".to_string()),
                _ => LinearError::ApiError {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let envelope: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| LinearError::InvalidResponse(e.to_string()))?;

        if let Some(errors) = envelope.errors {
            if let Some(first) = errors.first() {
                return Err(LinearError::Api(first.message.clone()));
            }
        }

        let data = envelope
            .data
            .ok_or_else(|| LinearError::InvalidResponse("response contained no data".to_string()))?;
        serde_json::from_value(data).map_err(|e| LinearError::InvalidResponse(e.to_string()))
    }
}

// --- Wire payload shapes ---

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct NodeList<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
struct TeamsData {
    teams: NodeList<Team>,
}

#[derive(Deserialize)]
struct IssuesData {
    issues: NodeList<Issue>,
}

#[derive(Deserialize)]
struct IssueData {
    issue: Option<Issue>,
}

#[derive(Deserialize)]
struct StatesData {
    #[serde(rename = "workflowStates")]
    workflow_states: NodeList<WorkflowState>,
}

#[derive(Deserialize)]
struct LabelsData {
    #[serde(rename = "issueLabels")]
    issue_labels: NodeList<IssueLabel>,
}

#[derive(Deserialize)]
struct IssueCreateData {
    #[serde(rename = "issueCreate")]
    issue_create: MutationPayload,
}

#[derive(Deserialize)]
struct IssueUpdateData {
    #[serde(rename = "issueUpdate")]
    issue_update: MutationPayload,
}

#[derive(Deserialize)]
struct MutationPayload {
    success: bool,
    issue: Option<Issue>,
}

// --- Extracted pure functions ---

/// Unwrap a mutation payload, surfacing server-reported failure.
fn issue_from_mutation(payload: MutationPayload, operation: &str) -> Result<Issue, LinearError> {
    if !payload.success {
        return Err(LinearError::Api(format!("{operation} reported failure")));
    }
    payload
        .issue
        .ok_or_else(|| LinearError::InvalidResponse(format!("{operation} returned no issue")))
}

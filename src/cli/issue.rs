//! Linear issue CLI commands.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::cli::print_yaml;
use crate::config::Settings;
use crate::linear::models::{CreateIssueInput, UpdateIssueInput};
use crate::linear::{LinearClient, WorkspaceRegistry};

/// Linear issue operations.
#[derive(Parser)]
pub struct IssueCommand {
    /// Issue subcommand to execute.
    #[command(subcommand)]
    pub command: IssueSubcommands,
}

/// Issue subcommands.
#[derive(Subcommand)]
pub enum IssueSubcommands {
    /// Lists issues for a team.
    List(ListCommand),
    /// Shows one issue by identifier.
    Get(GetCommand),
    /// Creates an issue.
    Create(CreateCommand),
    /// Updates an issue.
    Update(UpdateCommand),
    /// Lists the workflow states of a team.
    States(StatesCommand),
    /// Lists the labels of a team.
    Labels(LabelsCommand),
    /// Lists configured workspaces and their teams.
    Workspaces(WorkspacesCommand),
}

/// List command options.
#[derive(Parser)]
pub struct ListCommand {
    /// Team key to list issues for (e.g. PROJ).
    #[arg(value_name = "TEAM")]
    pub team: String,

    /// Filter by workflow state name (e.g. "In Progress").
    #[arg(long)]
    pub state: Option<String>,

    /// Maximum number of issues to return (default 50).
    #[arg(long)]
    pub limit: Option<u32>,

    /// Pin a workspace instead of resolving the team automatically.
    #[arg(long)]
    pub workspace: Option<String>,
}

/// Get command options.
#[derive(Parser)]
pub struct GetCommand {
    /// Issue identifier (e.g. PROJ-123).
    #[arg(value_name = "IDENTIFIER")]
    pub identifier: String,
}

/// Create command options.
#[derive(Parser)]
pub struct CreateCommand {
    /// Team key the issue belongs to (e.g. PROJ).
    #[arg(value_name = "TEAM")]
    pub team: String,

    /// Issue title.
    #[arg(long)]
    pub title: String,

    /// Markdown body.
    #[arg(long)]
    pub description: Option<String>,

    /// Workflow state name to start in (e.g. Todo).
    #[arg(long)]
    pub state: Option<String>,

    /// Label name to attach. Repeat for multiple labels.
    #[arg(long = "label", value_name = "LABEL")]
    pub labels: Vec<String>,

    /// Priority from 0 (none) to 4 (low).
    #[arg(long)]
    pub priority: Option<u8>,
}

/// Update command options.
#[derive(Parser)]
pub struct UpdateCommand {
    /// Issue identifier (e.g. PROJ-123).
    #[arg(value_name = "IDENTIFIER")]
    pub identifier: String,

    /// New title.
    #[arg(long)]
    pub title: Option<String>,

    /// New markdown body.
    #[arg(long)]
    pub description: Option<String>,

    /// Workflow state name to move the issue to.
    #[arg(long)]
    pub state: Option<String>,

    /// New priority from 0 (none) to 4 (low).
    #[arg(long)]
    pub priority: Option<u8>,
}

/// States command options.
#[derive(Parser)]
pub struct StatesCommand {
    /// Team key (e.g. PROJ).
    #[arg(value_name = "TEAM")]
    pub team: String,

    /// Pin a workspace instead of resolving the team automatically.
    #[arg(long)]
    pub workspace: Option<String>,
}

/// Labels command options.
#[derive(Parser)]
pub struct LabelsCommand {
    /// Team key (e.g. PROJ).
    #[arg(value_name = "TEAM")]
    pub team: String,

    /// Pin a workspace instead of resolving the team automatically.
    #[arg(long)]
    pub workspace: Option<String>,
}

/// Workspaces command options.
#[derive(Parser)]
pub struct WorkspacesCommand {}

impl IssueCommand {
    /// Executes the issue command.
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load()?;
        let registry = WorkspaceRegistry::from_settings(&settings)?;

        match self.command {
            IssueSubcommands::List(cmd) => cmd.execute(&registry).await,
            IssueSubcommands::Get(cmd) => cmd.execute(&registry).await,
            IssueSubcommands::Create(cmd) => cmd.execute(&registry).await,
            IssueSubcommands::Update(cmd) => cmd.execute(&registry).await,
            IssueSubcommands::States(cmd) => cmd.execute(&registry).await,
            IssueSubcommands::Labels(cmd) => cmd.execute(&registry).await,
            IssueSubcommands::Workspaces(cmd) => cmd.execute(&registry).await,
        }
    }
}

impl ListCommand {
    async fn execute(self, registry: &WorkspaceRegistry) -> Result<()> {
        let team = self.team.to_uppercase();
        let client = client_for(registry, self.workspace.as_deref(), &team).await?;
        let issues = client
            .list_issues(&team, self.state.as_deref(), self.limit)
            .await?;
        print_yaml(&issues)
    }
}

impl GetCommand {
    async fn execute(self, registry: &WorkspaceRegistry) -> Result<()> {
        let client = registry.client_for_issue(&self.identifier).await?;
        let issue = client.get_issue(&self.identifier).await?;
        print_yaml(&issue)
    }
}

impl CreateCommand {
    async fn execute(self, registry: &WorkspaceRegistry) -> Result<()> {
        let team = self.team.to_uppercase();
        let client = registry.client_for_team(&team).await?;

        let state_id = match self.state.as_deref() {
            Some(name) => Some(client.resolve_state_id(&team, name).await?),
            None => None,
        };
        let label_ids = if self.labels.is_empty() {
            Vec::new()
        } else {
            client.resolve_label_ids(&team, &self.labels).await?
        };

        let input = CreateIssueInput {
            team,
            title: self.title,
            description: self.description,
            priority: self.priority,
            state_id,
            label_ids,
        };
        let issue = client.create_issue(&input).await?;
        println!("✅ Created issue {}", issue.identifier);
        print_yaml(&issue)
    }
}

impl UpdateCommand {
    async fn execute(self, registry: &WorkspaceRegistry) -> Result<()> {
        let client = registry.client_for_issue(&self.identifier).await?;

        let state_id = match self.state.as_deref() {
            Some(name) => {
                // Identifier format was already checked by the registry.
                let team = self
                    .identifier
                    .split('-')
                    .next()
                    .unwrap_or_default()
                    .to_uppercase();
                Some(client.resolve_state_id(&team, name).await?)
            }
            None => None,
        };

        let input = UpdateIssueInput {
            title: self.title,
            description: self.description,
            priority: self.priority,
            state_id,
            label_ids: None,
        };
        if input.is_empty() {
            anyhow::bail!(
                "No fields to update: set at least one of --title, --description, --state or --priority"
            );
        }

        let issue = client.update_issue(&self.identifier, &input).await?;
        println!("✅ Updated issue {}", issue.identifier);
        print_yaml(&issue)
    }
}

impl StatesCommand {
    async fn execute(self, registry: &WorkspaceRegistry) -> Result<()> {
        let team = self.team.to_uppercase();
        let client = client_for(registry, self.workspace.as_deref(), &team).await?;
        let states = client.list_workflow_states(&team).await?;
        print_yaml(&states)
    }
}

impl LabelsCommand {
    async fn execute(self, registry: &WorkspaceRegistry) -> Result<()> {
        let team = self.team.to_uppercase();
        let client = client_for(registry, self.workspace.as_deref(), &team).await?;
        let labels = client.list_labels(&team).await?;
        print_yaml(&labels)
    }
}

impl WorkspacesCommand {
    async fn execute(self, registry: &WorkspaceRegistry) -> Result<()> {
        let workspaces = registry.workspaces_with_teams().await;
        print_yaml(&workspaces)
    }
}

/// Picks a pinned workspace client or resolves the team across workspaces.
async fn client_for<'a>(
    registry: &'a WorkspaceRegistry,
    workspace: Option<&str>,
    team: &str,
) -> Result<&'a LinearClient> {
    let client = match workspace {
        Some(name) => registry.client(name)?,
        None => registry.client_for_team(team).await?,
    };
    Ok(client)
}

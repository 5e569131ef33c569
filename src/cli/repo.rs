//! GitHub repository CLI commands.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::cli::print_yaml;
use crate::config::Settings;
use crate::conventions::{BranchNameEngine, CommitMessageEngine, ConventionCatalog};
use crate::github::{CreatePrRequest, GitHubClient, PrStateFilter};

/// GitHub repository operations.
#[derive(Parser)]
pub struct RepoCommand {
    /// Repo subcommand to execute.
    #[command(subcommand)]
    pub command: RepoSubcommands,
}

/// Repo subcommands.
#[derive(Subcommand)]
pub enum RepoSubcommands {
    /// Lists the branches of a repository.
    Branches(BranchesCommand),
    /// Creates a convention-checked branch.
    Branch(CreateBranchCommand),
    /// Lists pull requests.
    Prs(PrsCommand),
    /// Opens a convention-checked pull request.
    Pr(CreatePrCommand),
    /// Shows the default branch of a repository.
    #[command(name = "default-branch")]
    DefaultBranch(DefaultBranchCommand),
}

/// Branches command options.
#[derive(Parser)]
pub struct BranchesCommand {
    /// Repository name, defaults to the DEFAULT_REPO setting.
    #[arg(long)]
    pub repo: Option<String>,
}

/// Branch create command options.
#[derive(Parser)]
pub struct CreateBranchCommand {
    /// Branch name to create. Must pass branch name validation.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Repository name, defaults to the DEFAULT_REPO setting.
    #[arg(long)]
    pub repo: Option<String>,

    /// Branch to fork from, defaults to the repository's default branch.
    #[arg(long)]
    pub base: Option<String>,
}

/// Prs command options.
#[derive(Parser)]
pub struct PrsCommand {
    /// Repository name, defaults to the DEFAULT_REPO setting.
    #[arg(long)]
    pub repo: Option<String>,

    /// State filter: open (default), closed or all.
    #[arg(long, default_value = "open")]
    pub state: String,
}

/// Pr create command options.
#[derive(Parser)]
pub struct CreatePrCommand {
    /// Pull request title. Must pass commit message validation.
    #[arg(long)]
    pub title: String,

    /// Source branch name.
    #[arg(long)]
    pub head: String,

    /// Target branch, defaults to the repository's default branch.
    #[arg(long)]
    pub base: Option<String>,

    /// Markdown body.
    #[arg(long)]
    pub body: Option<String>,

    /// Repository name, defaults to the DEFAULT_REPO setting.
    #[arg(long)]
    pub repo: Option<String>,

    /// Open as a draft pull request.
    #[arg(long)]
    pub draft: bool,
}

/// Default branch command options.
#[derive(Parser)]
pub struct DefaultBranchCommand {
    /// Repository name, defaults to the DEFAULT_REPO setting.
    #[arg(long)]
    pub repo: Option<String>,
}

impl RepoCommand {
    /// Executes the repo command.
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load()?;
        let client = GitHubClient::new(
            &settings.github_token,
            &settings.github_api_url,
            &settings.github_org,
            settings.request_timeout,
        )?;

        match self.command {
            RepoSubcommands::Branches(cmd) => cmd.execute(&client, &settings).await,
            RepoSubcommands::Branch(cmd) => cmd.execute(&client, &settings).await,
            RepoSubcommands::Prs(cmd) => cmd.execute(&client, &settings).await,
            RepoSubcommands::Pr(cmd) => cmd.execute(&client, &settings).await,
            RepoSubcommands::DefaultBranch(cmd) => cmd.execute(&client, &settings).await,
        }
    }
}

impl BranchesCommand {
    async fn execute(self, client: &GitHubClient, settings: &Settings) -> Result<()> {
        let repo = repo_or_default(self.repo, settings);
        let branches = client.list_branches(&repo).await?;
        print_yaml(&branches)
    }
}

impl CreateBranchCommand {
    async fn execute(self, client: &GitHubClient, settings: &Settings) -> Result<()> {
        let catalog = ConventionCatalog::standard();
        let validation = BranchNameEngine::new(&catalog).validate(&self.name);
        if !validation.is_valid {
            println!("❌ Branch name violates the convention");
            print_yaml(&validation)?;
            std::process::exit(1);
        }

        let repo = repo_or_default(self.repo, settings);
        let base = match self.base {
            Some(base) => base,
            None => client.get_default_branch(&repo).await?,
        };
        let sha = client.get_branch_sha(&repo, &base).await?;
        let git_ref = client.create_branch(&repo, &self.name, &sha).await?;

        println!("✅ Created branch {} from {base}", self.name);
        print_yaml(&git_ref)
    }
}

impl PrsCommand {
    async fn execute(self, client: &GitHubClient, settings: &Settings) -> Result<()> {
        let state: PrStateFilter = self.state.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        let repo = repo_or_default(self.repo, settings);
        let pull_requests = client.list_pull_requests(&repo, state).await?;
        print_yaml(&pull_requests)
    }
}

impl CreatePrCommand {
    async fn execute(self, client: &GitHubClient, settings: &Settings) -> Result<()> {
        let catalog = ConventionCatalog::standard();
        let validation = CommitMessageEngine::new(&catalog).validate(&self.title);
        if !validation.is_valid {
            println!("❌ Pull request title violates the commit convention");
            print_yaml(&validation)?;
            std::process::exit(1);
        }

        let repo = repo_or_default(self.repo, settings);
        let base = match self.base {
            Some(base) => base,
            None => client.get_default_branch(&repo).await?,
        };

        let request = CreatePrRequest {
            title: self.title,
            head: self.head,
            base,
            body: self.body,
            draft: self.draft,
        };
        let pull_request = client.create_pull_request(&repo, &request).await?;

        println!("✅ Opened pull request #{}", pull_request.number);
        print_yaml(&pull_request)
    }
}

impl DefaultBranchCommand {
    async fn execute(self, client: &GitHubClient, settings: &Settings) -> Result<()> {
        let repo = repo_or_default(self.repo, settings);
        let branch = client.get_default_branch(&repo).await?;
        println!("{branch}");
        Ok(())
    }
}

/// Falls back to the configured default repository.
fn repo_or_default(repo: Option<String>, settings: &Settings) -> String {
    repo.unwrap_or_else(|| settings.default_repo.clone())
}

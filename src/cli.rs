//! CLI interface for arc-flow.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

pub mod branch;
pub mod commit;
pub mod conventions;
pub mod issue;
pub mod repo;

/// arc-flow: Linear and GitHub workflow automation.
#[derive(Parser)]
#[command(name = "arc-flow")]
#[command(
    about = "Linear and GitHub workflow automation with shared naming conventions",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Branch name operations.
    Branch(branch::BranchCommand),
    /// Commit message operations.
    Commit(commit::CommitCommand),
    /// Displays the naming conventions.
    Conventions(conventions::ConventionsCommand),
    /// Linear issue operations.
    Issue(issue::IssueCommand),
    /// GitHub repository operations.
    Repo(repo::RepoCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Branch(cmd) => cmd.execute(),
            Commands::Commit(cmd) => cmd.execute(),
            Commands::Conventions(cmd) => cmd.execute(),
            Commands::Issue(cmd) => cmd.execute().await,
            Commands::Repo(cmd) => cmd.execute().await,
        }
    }
}

/// Prints a value as YAML to stdout.
pub(crate) fn print_yaml<T: Serialize>(value: &T) -> Result<()> {
    let yaml = serde_yaml::to_string(value).context("Failed to serialize output as YAML")?;
    println!("{yaml}");
    Ok(())
}

//! Commit message CLI commands.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::conventions::{CommitMessageEngine, ConventionCatalog};

/// Commit message operations.
#[derive(Parser)]
pub struct CommitCommand {
    /// Commit subcommand to execute.
    #[command(subcommand)]
    pub command: CommitSubcommands,
}

/// Commit subcommands.
#[derive(Subcommand)]
pub enum CommitSubcommands {
    /// Validates a commit message against the conventional format.
    Validate(ValidateCommand),
    /// Generates a conventional commit message.
    Generate(GenerateCommand),
}

/// Validate command options.
#[derive(Parser)]
pub struct ValidateCommand {
    /// Commit message to validate. Only the first line is checked.
    #[arg(value_name = "MESSAGE")]
    pub message: String,
}

/// Generate command options.
#[derive(Parser)]
pub struct GenerateCommand {
    /// Commit type (e.g. feat, fix, chore).
    #[arg(long)]
    pub commit_type: String,

    /// Subject line content.
    #[arg(long)]
    pub subject: String,

    /// Optional scope (e.g. the component the change touches).
    #[arg(long)]
    pub scope: Option<String>,
}

impl CommitCommand {
    /// Executes the commit command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            CommitSubcommands::Validate(cmd) => cmd.execute(),
            CommitSubcommands::Generate(cmd) => cmd.execute(),
        }
    }
}

impl ValidateCommand {
    /// Executes the validate command. Exits with code 1 when the message
    /// does not follow the convention.
    pub fn execute(self) -> Result<()> {
        let catalog = ConventionCatalog::standard();
        let result = CommitMessageEngine::new(&catalog).validate(&self.message);

        if result.is_valid {
            println!("✅ Commit message follows the convention");
        } else {
            println!("❌ Commit message violates the convention");
        }
        crate::cli::print_yaml(&result)?;

        if !result.is_valid {
            std::process::exit(1);
        }
        Ok(())
    }
}

impl GenerateCommand {
    /// Executes the generate command, printing the commit message.
    pub fn execute(self) -> Result<()> {
        let catalog = ConventionCatalog::standard();
        let message = CommitMessageEngine::new(&catalog).generate(
            &self.commit_type,
            &self.subject,
            self.scope.as_deref(),
        )?;
        println!("{message}");
        Ok(())
    }
}

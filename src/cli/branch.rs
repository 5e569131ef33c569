//! Branch name CLI commands.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::conventions::{BranchNameEngine, ConventionCatalog, IssueRef};

/// Branch name operations.
#[derive(Parser)]
pub struct BranchCommand {
    /// Branch subcommand to execute.
    #[command(subcommand)]
    pub command: BranchSubcommands,
}

/// Branch subcommands.
#[derive(Subcommand)]
pub enum BranchSubcommands {
    /// Validates a branch name against the naming convention.
    Validate(ValidateCommand),
    /// Generates a convention-compliant branch name.
    Generate(GenerateCommand),
}

/// Validate command options.
#[derive(Parser)]
pub struct ValidateCommand {
    /// Branch name to validate (e.g. feature/PROJ-123-user-authentication).
    #[arg(value_name = "NAME")]
    pub name: String,
}

/// Generate command options.
#[derive(Parser)]
pub struct GenerateCommand {
    /// Branch type (e.g. feature, bugfix, hotfix).
    #[arg(long)]
    pub branch_type: String,

    /// Free-form description, slugified into the branch name.
    #[arg(long)]
    pub description: String,

    /// Linear issue identifier to embed (e.g. PROJ-123).
    #[arg(long, value_name = "TEAM-123")]
    pub issue: Option<String>,
}

impl BranchCommand {
    /// Executes the branch command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            BranchSubcommands::Validate(cmd) => cmd.execute(),
            BranchSubcommands::Generate(cmd) => cmd.execute(),
        }
    }
}

impl ValidateCommand {
    /// Executes the validate command. Exits with code 1 when the name
    /// does not follow the convention.
    pub fn execute(self) -> Result<()> {
        let catalog = ConventionCatalog::standard();
        let result = BranchNameEngine::new(&catalog).validate(&self.name);

        if result.is_valid {
            println!("✅ Branch name follows the convention");
        } else {
            println!("❌ Branch name violates the convention");
        }
        crate::cli::print_yaml(&result)?;

        if !result.is_valid {
            std::process::exit(1);
        }
        Ok(())
    }
}

impl GenerateCommand {
    /// Executes the generate command, printing the branch name.
    pub fn execute(self) -> Result<()> {
        let issue = self
            .issue
            .as_deref()
            .map(str::parse::<IssueRef>)
            .transpose()?;

        let catalog = ConventionCatalog::standard();
        let name =
            BranchNameEngine::new(&catalog).generate(&self.branch_type, &self.description, issue.as_ref())?;
        println!("{name}");
        Ok(())
    }
}

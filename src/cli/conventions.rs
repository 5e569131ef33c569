//! Conventions command — displays the naming convention guide.

use anyhow::Result;
use clap::Parser;

use crate::conventions::ConventionCatalog;

/// Conventions command options.
#[derive(Parser)]
pub struct ConventionsCommand {
    /// Output format: yaml (default) or json.
    #[arg(long, default_value = "yaml")]
    pub format: String,
}

impl ConventionsCommand {
    /// Executes the conventions command.
    pub fn execute(self) -> Result<()> {
        let guide = ConventionCatalog::standard().guide();

        match self.format.as_str() {
            "yaml" => crate::cli::print_yaml(&guide)?,
            "json" => println!("{}", serde_json::to_string_pretty(&guide)?),
            other => anyhow::bail!("Unsupported format '{other}'. Use yaml or json"),
        }
        Ok(())
    }
}

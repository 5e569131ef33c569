//! # arc-flow
//!
//! Workflow automation bridging Linear issue tracking and GitHub source
//! hosting, built around a shared naming convention for branches and
//! commit messages.
//!
//! ## Features
//!
//! - Branch name and commit message validation with fix suggestions
//! - Multi-workspace Linear issue management
//! - Convention-checked GitHub branch and pull request creation
//! - MCP server exposing the whole tool set to agents (feature `mcp`)
//!
//! ## Quick Start
//!
//! ```rust
//! use arc_flow::conventions::{BranchNameEngine, ConventionCatalog};
//!
//! let catalog = ConventionCatalog::standard();
//! let result = BranchNameEngine::new(&catalog).validate("feature/PROJ-123-user-authentication");
//! assert!(result.is_valid);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod conventions;
pub mod github;
pub mod linear;
#[cfg(feature = "mcp")]
pub mod mcp;

pub use crate::cli::Cli;

/// The current version of arc-flow.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

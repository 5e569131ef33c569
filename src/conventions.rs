//! Naming-convention validation and generation.
//!
//! The engines in this module decide whether a branch name or commit message
//! conforms to the team grammar, explain precisely why not, and synthesize
//! conforming names from loose inputs. Everything here is a pure function of
//! its input text and the immutable [`ConventionCatalog`]; there is no I/O
//! and no shared mutable state.

pub mod branch;
pub mod catalog;
pub mod commit;
pub mod result;
mod suggest;

pub use branch::{BranchNameComponents, BranchNameEngine, IssueRef};
pub use catalog::{ConventionCatalog, ConventionGuide};
pub use commit::{CommitMessageComponents, CommitMessageEngine};
pub use result::{ValidationError, ValidationErrorKind, ValidationResult};

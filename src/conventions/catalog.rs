//! The shared catalog of allowed branch and commit types.

use serde::{Deserialize, Serialize};

/// Allowed type tokens for branch names and commit messages.
///
/// Built once at startup and passed by reference into the engines; never
/// mutated afterwards. Both token lists are fixed, non-empty, lowercase, and
/// duplicate-free, and their declaration order is meaningful (suggestion
/// ties resolve to the earliest entry).
#[derive(Debug, Clone)]
pub struct ConventionCatalog {
    branch_types: Vec<String>,
    commit_types: Vec<String>,
}

impl Default for ConventionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl ConventionCatalog {
    /// Creates the standard catalog.
    pub fn standard() -> Self {
        Self {
            branch_types: ["feature", "bugfix", "hotfix", "docs", "spike", "release"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            commit_types: [
                "feat", "fix", "docs", "style", "refactor", "perf", "test", "chore", "build",
                "ci", "revert",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
        }
    }

    /// Allowed branch type tokens in declaration order.
    pub fn branch_types(&self) -> &[String] {
        &self.branch_types
    }

    /// Allowed commit type tokens in declaration order.
    pub fn commit_types(&self) -> &[String] {
        &self.commit_types
    }

    /// Returns true when `token` is an allowed branch type.
    pub fn is_branch_type(&self, token: &str) -> bool {
        self.branch_types.iter().any(|t| t == token)
    }

    /// Returns true when `token` is an allowed commit type.
    pub fn is_commit_type(&self, token: &str) -> bool {
        self.commit_types.iter().any(|t| t == token)
    }

    /// Builds the human-facing summary of the naming rules.
    pub fn guide(&self) -> ConventionGuide {
        ConventionGuide {
            branch_format: "<type>/[<TEAM-123>-]<description>".to_string(),
            branch_types: self.branch_types.clone(),
            branch_examples: vec![
                "feature/PROJ-123-user-authentication".to_string(),
                "bugfix/PROJ-456-fix-map-crash".to_string(),
                "docs/update-readme".to_string(),
            ],
            commit_format: "<type>[(<scope>)]: <subject>".to_string(),
            commit_types: self.commit_types.clone(),
            commit_examples: vec![
                "feat(search): add restaurant filtering".to_string(),
                "fix: resolve crash on startup".to_string(),
                "docs: describe the release process".to_string(),
            ],
        }
    }
}

/// Serializable description of the naming rules.
///
/// Returned verbatim to callers asking what the conventions are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConventionGuide {
    /// Branch name grammar, with the issue reference part optional.
    pub branch_format: String,
    /// Allowed branch type tokens.
    pub branch_types: Vec<String>,
    /// Canonical branch name examples.
    pub branch_examples: Vec<String>,
    /// Commit header grammar, with the scope part optional.
    pub commit_format: String,
    /// Allowed commit type tokens.
    pub commit_types: Vec<String>,
    /// Canonical commit header examples.
    pub commit_examples: Vec<String>,
}

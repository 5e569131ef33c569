//! Branch name validation and generation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::conventions::catalog::ConventionCatalog;
use crate::conventions::result::{ValidationError, ValidationErrorKind, ValidationResult};
use crate::conventions::suggest::closest_token;

/// Branch type assumed when suggesting a name for unstructured input.
const FALLBACK_BRANCH_TYPE: &str = "feature";

/// Reference to a tracked issue, rendered as `TEAM-123`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    /// Uppercase team key, e.g. `PROJ`.
    pub team: String,
    /// Issue number within the team.
    pub number: u64,
}

impl IssueRef {
    /// Creates an issue reference, normalizing the team key to uppercase.
    pub fn new(team: impl Into<String>, number: u64) -> Self {
        Self {
            team: team.into().to_ascii_uppercase(),
            number,
        }
    }
}

impl fmt::Display for IssueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.team, self.number)
    }
}

impl FromStr for IssueRef {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match scan_issue(&upper) {
            Some((issue, "")) => Ok(issue),
            _ => Err(ValidationError::new(
                ValidationErrorKind::InvalidDescription,
                format!("Invalid issue reference '{s}'. Expected format: TEAM-123"),
            )),
        }
    }
}

/// Parsed pieces of a branch name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchNameComponents {
    /// Branch type token, normalized to lowercase.
    pub branch_type: String,
    /// Leading issue reference, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<IssueRef>,
    /// Hyphen-separated description slug.
    pub description: String,
    /// The input exactly as supplied.
    pub raw: String,
}

impl BranchNameComponents {
    /// Renders the canonical branch name for these components.
    pub fn canonical(&self) -> String {
        match &self.issue {
            Some(issue) => format!("{}/{}-{}", self.branch_type, issue, self.description),
            None => format!("{}/{}", self.branch_type, self.description),
        }
    }
}

/// Branch name parser, validator, and generator.
pub struct BranchNameEngine<'a> {
    catalog: &'a ConventionCatalog,
}

impl<'a> BranchNameEngine<'a> {
    /// Creates an engine over the given catalog.
    pub fn new(catalog: &'a ConventionCatalog) -> Self {
        Self { catalog }
    }

    /// Validates a raw branch name against the convention grammar.
    pub fn validate(&self, raw: &str) -> ValidationResult<BranchNameComponents> {
        let Some((type_part, rest)) = raw.split_once('/') else {
            let error = ValidationError::new(
                ValidationErrorKind::MissingSeparator,
                format!(
                    "Branch name '{raw}' is missing the '/' separator. \
                     Expected format: <type>/<description>"
                ),
            );
            return ValidationResult::invalid(error)
                .with_suggestion(self.generate(FALLBACK_BRANCH_TYPE, raw, None).ok());
        };

        let branch_type = type_part.to_ascii_lowercase();
        if !self.catalog.is_branch_type(&branch_type) {
            let error = ValidationError::new(
                ValidationErrorKind::UnknownType,
                format!(
                    "Unknown branch type '{type_part}'. Allowed types: {}",
                    self.catalog.branch_types().join(", ")
                ),
            );
            let suggestion = closest_token(self.catalog.branch_types(), &branch_type)
                .map(|closest| format!("{closest}/{rest}"));
            return ValidationResult::invalid(error).with_suggestion(suggestion);
        }

        // A leading TEAM-123 reference counts only when another hyphen
        // separates it from the description.
        let (issue, description) = match scan_issue(rest) {
            Some((issue, remainder)) if remainder.starts_with('-') => (Some(issue), &remainder[1..]),
            _ => (None, rest),
        };

        if let Err(error) = check_description(description) {
            return ValidationResult::invalid(error)
                .with_suggestion(self.generate(&branch_type, description, issue.as_ref()).ok());
        }

        ValidationResult::valid(BranchNameComponents {
            branch_type,
            issue,
            description: description.to_string(),
            raw: raw.to_string(),
        })
    }

    /// Generates a canonical branch name from loose inputs.
    ///
    /// The description goes through the slug pipeline (lowercase, runs of
    /// non-alphanumerics become single hyphens, no edge hyphens); the output
    /// always validates.
    pub fn generate(
        &self,
        branch_type: &str,
        description: &str,
        issue: Option<&IssueRef>,
    ) -> Result<String, ValidationError> {
        let branch_type = branch_type.to_ascii_lowercase();
        if !self.catalog.is_branch_type(&branch_type) {
            return Err(ValidationError::new(
                ValidationErrorKind::UnknownType,
                format!(
                    "Unknown branch type '{branch_type}'. Allowed types: {}",
                    self.catalog.branch_types().join(", ")
                ),
            ));
        }

        let slug = slugify(description);
        if slug.is_empty() {
            return Err(ValidationError::new(
                ValidationErrorKind::InvalidDescription,
                format!("Branch description '{description}' is empty after normalization"),
            ));
        }

        match issue {
            Some(issue) => {
                let issue = normalize_issue(issue)?;
                Ok(format!("{branch_type}/{issue}-{slug}"))
            }
            None => Ok(format!("{branch_type}/{slug}")),
        }
    }
}

// --- Extracted pure functions ---

/// Scans a leading `TEAM-NUMBER` issue reference.
///
/// The team key is two or more uppercase letters or digits starting with a
/// letter; the number must parse to a positive integer. Returns the
/// reference with the unconsumed remainder.
fn scan_issue(input: &str) -> Option<(IssueRef, &str)> {
    let team_len = input
        .chars()
        .take_while(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .count();
    let team = &input[..team_len];
    if team.len() < 2 || !team.starts_with(|c: char| c.is_ascii_uppercase()) {
        return None;
    }

    let after_team = input[team_len..].strip_prefix('-')?;
    let digits_len = after_team.chars().take_while(char::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let number: u64 = after_team[..digits_len].parse().ok()?;
    if number == 0 {
        return None;
    }

    Some((
        IssueRef {
            team: team.to_string(),
            number,
        },
        &after_team[digits_len..],
    ))
}

/// Checks a description slug: non-empty, `[a-z0-9-]` only, no edge or
/// repeated hyphens.
fn check_description(description: &str) -> Result<(), ValidationError> {
    if description.is_empty() {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidDescription,
            "Branch description must not be empty",
        ));
    }
    if let Some(bad) = description
        .chars()
        .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && *c != '-')
    {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidDescription,
            format!(
                "Branch description '{description}' may only contain lowercase letters, \
                 digits, and hyphens (found '{bad}')"
            ),
        ));
    }
    if description.starts_with('-') || description.ends_with('-') || description.contains("--") {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidDescription,
            format!(
                "Branch description '{description}' must not have leading, trailing, \
                 or repeated hyphens"
            ),
        ));
    }
    Ok(())
}

/// Normalizes free text into a lowercase hyphen-separated slug.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Uppercases and shape-checks an issue reference for rendering.
fn normalize_issue(issue: &IssueRef) -> Result<IssueRef, ValidationError> {
    let team = issue.team.to_ascii_uppercase();
    let shape_ok = team.len() >= 2
        && team.starts_with(|c: char| c.is_ascii_uppercase())
        && team.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    if !shape_ok || issue.number == 0 {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidDescription,
            format!(
                "Invalid issue reference '{}-{}'. Expected format: TEAM-123",
                issue.team, issue.number
            ),
        ));
    }
    Ok(IssueRef {
        team,
        number: issue.number,
    })
}

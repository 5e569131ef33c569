//! Commit message validation and generation.

use serde::Serialize;

use crate::conventions::catalog::ConventionCatalog;
use crate::conventions::result::{ValidationError, ValidationErrorKind, ValidationResult};
use crate::conventions::suggest::closest_token;

/// Commit type assumed when suggesting a header for unstructured input.
const FALLBACK_COMMIT_TYPE: &str = "feat";

/// Parsed pieces of a commit message header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitMessageComponents {
    /// Commit type token, normalized to lowercase.
    pub commit_type: String,
    /// Scope token, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Subject text after the separator.
    pub subject: String,
    /// The input exactly as supplied.
    pub raw: String,
}

impl CommitMessageComponents {
    /// Renders the canonical header for these components.
    pub fn canonical(&self) -> String {
        render(&self.commit_type, self.scope.as_deref(), &self.subject)
    }
}

/// Commit message parser, validator, and generator.
pub struct CommitMessageEngine<'a> {
    catalog: &'a ConventionCatalog,
}

impl<'a> CommitMessageEngine<'a> {
    /// Creates an engine over the given catalog.
    pub fn new(catalog: &'a ConventionCatalog) -> Self {
        Self { catalog }
    }

    /// Validates a commit message against the convention grammar.
    ///
    /// Only the first line (the header) is parsed; body lines after it are
    /// outside the grammar.
    pub fn validate(&self, raw: &str) -> ValidationResult<CommitMessageComponents> {
        let header = raw.lines().next().unwrap_or("");

        let Some(head_end) = header.find(['(', ':']) else {
            let error = ValidationError::new(
                ValidationErrorKind::MissingSeparator,
                format!(
                    "Commit message '{header}' is missing the ': ' separator. \
                     Expected format: <type>(<scope>): <subject>"
                ),
            );
            return ValidationResult::invalid(error)
                .with_suggestion(self.generate(FALLBACK_COMMIT_TYPE, header, None).ok());
        };

        let type_part = &header[..head_end];
        let commit_type = type_part.to_ascii_lowercase();
        if !self.catalog.is_commit_type(&commit_type) {
            let error = ValidationError::new(
                ValidationErrorKind::UnknownType,
                format!(
                    "Unknown commit type '{type_part}'. Allowed types: {}",
                    self.catalog.commit_types().join(", ")
                ),
            );
            let suggestion = closest_token(self.catalog.commit_types(), &commit_type)
                .map(|closest| format!("{closest}{}", &header[head_end..]));
            return ValidationResult::invalid(error).with_suggestion(suggestion);
        }

        let (scope, after_scope) = if header[head_end..].starts_with('(') {
            let scope_body = &header[head_end + 1..];
            let Some(close) = scope_body.find(')') else {
                return ValidationResult::invalid(ValidationError::new(
                    ValidationErrorKind::InvalidScope,
                    format!("Commit scope in '{header}' is missing its closing parenthesis"),
                ));
            };
            let scope = &scope_body[..close];
            if let Err(error) = check_scope(scope) {
                return ValidationResult::invalid(error);
            }
            (Some(scope.to_string()), &scope_body[close + 1..])
        } else {
            (None, &header[head_end..])
        };

        let Some(subject) = after_scope.strip_prefix(": ") else {
            return ValidationResult::invalid(ValidationError::new(
                ValidationErrorKind::MissingSeparator,
                format!("Commit message '{header}' is missing the ': ' separator after the type"),
            ));
        };

        if subject.trim().is_empty() {
            return ValidationResult::invalid(ValidationError::new(
                ValidationErrorKind::EmptySubject,
                format!("Commit message '{header}' has an empty subject"),
            ));
        }

        if subject.starts_with(char::is_uppercase) {
            let error = ValidationError::new(
                ValidationErrorKind::SubjectCapitalized,
                format!("Commit subject '{subject}' must not start with a capital letter"),
            );
            let suggestion = render(&commit_type, scope.as_deref(), &lowercase_first(subject));
            return ValidationResult::invalid(error).with_suggestion(Some(suggestion));
        }

        if subject.ends_with('.') {
            let error = ValidationError::new(
                ValidationErrorKind::TrailingPeriod,
                format!("Commit subject '{subject}' must not end with a period"),
            );
            let suggestion = render(
                &commit_type,
                scope.as_deref(),
                subject.trim_end_matches('.'),
            );
            return ValidationResult::invalid(error).with_suggestion(Some(suggestion));
        }

        ValidationResult::valid(CommitMessageComponents {
            commit_type,
            scope,
            subject: subject.to_string(),
            raw: raw.to_string(),
        })
    }

    /// Generates a canonical commit header from loose inputs.
    ///
    /// The subject keeps its wording; only the first character is lowercased
    /// and trailing periods are stripped. The output always validates.
    pub fn generate(
        &self,
        commit_type: &str,
        subject: &str,
        scope: Option<&str>,
    ) -> Result<String, ValidationError> {
        let commit_type = commit_type.to_ascii_lowercase();
        if !self.catalog.is_commit_type(&commit_type) {
            return Err(ValidationError::new(
                ValidationErrorKind::UnknownType,
                format!(
                    "Unknown commit type '{commit_type}'. Allowed types: {}",
                    self.catalog.commit_types().join(", ")
                ),
            ));
        }

        let scope = match scope {
            Some(scope) => {
                let scope = scope.to_ascii_lowercase();
                check_scope(&scope)?;
                Some(scope)
            }
            None => None,
        };

        let subject = normalize_subject(subject)?;
        Ok(render(&commit_type, scope.as_deref(), &subject))
    }
}

// --- Extracted pure functions ---

/// Renders the canonical header string.
fn render(commit_type: &str, scope: Option<&str>, subject: &str) -> String {
    match scope {
        Some(scope) => format!("{commit_type}({scope}): {subject}"),
        None => format!("{commit_type}: {subject}"),
    }
}

/// Checks a scope token: non-empty, `[a-z0-9-]` only.
fn check_scope(scope: &str) -> Result<(), ValidationError> {
    if scope.is_empty() {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidScope,
            "Commit scope must not be empty",
        ));
    }
    if let Some(bad) = scope
        .chars()
        .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && *c != '-')
    {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidScope,
            format!(
                "Commit scope '{scope}' may only contain lowercase letters, digits, \
                 and hyphens (found '{bad}')"
            ),
        ));
    }
    Ok(())
}

/// Trims the subject, lowercases its first alphabetic character, and strips
/// trailing periods. Multi-line input is cut to its first line.
fn normalize_subject(subject: &str) -> Result<String, ValidationError> {
    let header = subject.lines().next().unwrap_or("");
    let trimmed = header
        .trim()
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace());
    if trimmed.is_empty() {
        return Err(ValidationError::new(
            ValidationErrorKind::EmptySubject,
            "Commit subject must not be empty",
        ));
    }
    Ok(lowercase_first(trimmed))
}

/// Lowercases the first character when alphabetic.
fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => first.to_lowercase().chain(chars).collect(),
        Some(first) => std::iter::once(first).chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::result::ValidationErrorKind as Kind;

    fn engine(catalog: &ConventionCatalog) -> CommitMessageEngine<'_> {
        CommitMessageEngine::new(catalog)
    }

    // ── CommitMessageEngine::validate ────────────────────────────────

    #[test]
    fn valid_with_scope() {
        let catalog = ConventionCatalog::standard();
        let result = engine(&catalog).validate("feat(search): add cuisine filters");
        assert!(result.is_valid);
        let components = result.components.unwrap();
        assert_eq!(components.commit_type, "feat");
        assert_eq!(components.scope.as_deref(), Some("search"));
        assert_eq!(components.subject, "add cuisine filters");
    }

    #[test]
    fn valid_without_scope() {
        let catalog = ConventionCatalog::standard();
        let result = engine(&catalog).validate("fix: resolve crash on startup");
        assert!(result.is_valid);
        let components = result.components.unwrap();
        assert_eq!(components.commit_type, "fix");
        assert_eq!(components.scope, None);
        assert_eq!(components.subject, "resolve crash on startup");
    }

    #[test]
    fn plain_sentence_is_missing_separator() {
        let catalog = ConventionCatalog::standard();
        let result = engine(&catalog).validate("Added new search feature");
        assert!(!result.is_valid);
        assert_eq!(result.error_kind(), Some(Kind::MissingSeparator));
        assert_eq!(result.suggestions, ["feat: added new search feature"]);
    }

    #[test]
    fn colon_without_space_is_missing_separator() {
        let catalog = ConventionCatalog::standard();
        let result = engine(&catalog).validate("feat:no space");
        assert_eq!(result.error_kind(), Some(Kind::MissingSeparator));
    }

    #[test]
    fn unknown_type_suggests_closest() {
        let catalog = ConventionCatalog::standard();
        let result = engine(&catalog).validate("feta(search): add filters");
        assert!(!result.is_valid);
        assert_eq!(result.error_kind(), Some(Kind::UnknownType));
        assert_eq!(result.suggestions, ["feat(search): add filters"]);
    }

    #[test]
    fn uppercase_type_is_normalized() {
        let catalog = ConventionCatalog::standard();
        let result = engine(&catalog).validate("Fix: resolve crash");
        assert!(result.is_valid);
        assert_eq!(result.components.unwrap().commit_type, "fix");
    }

    #[test]
    fn empty_scope_rejected() {
        let catalog = ConventionCatalog::standard();
        let result = engine(&catalog).validate("feat(): add filters");
        assert_eq!(result.error_kind(), Some(Kind::InvalidScope));
    }

    #[test]
    fn uppercase_scope_rejected() {
        let catalog = ConventionCatalog::standard();
        let result = engine(&catalog).validate("feat(Search): add filters");
        assert_eq!(result.error_kind(), Some(Kind::InvalidScope));
    }

    #[test]
    fn unclosed_scope_rejected() {
        let catalog = ConventionCatalog::standard();
        let result = engine(&catalog).validate("feat(search: add filters");
        assert_eq!(result.error_kind(), Some(Kind::InvalidScope));
    }

    #[test]
    fn empty_subject_rejected() {
        let catalog = ConventionCatalog::standard();
        let result = engine(&catalog).validate("feat: ");
        assert_eq!(result.error_kind(), Some(Kind::EmptySubject));
        let result = engine(&catalog).validate("feat(search):   ");
        assert_eq!(result.error_kind(), Some(Kind::EmptySubject));
    }

    #[test]
    fn capitalized_subject_rejected_with_suggestion() {
        let catalog = ConventionCatalog::standard();
        let result = engine(&catalog).validate("feat(search): Add filters");
        assert_eq!(result.error_kind(), Some(Kind::SubjectCapitalized));
        assert_eq!(result.suggestions, ["feat(search): add filters"]);
    }

    #[test]
    fn trailing_period_rejected_with_suggestion() {
        let catalog = ConventionCatalog::standard();
        let result = engine(&catalog).validate("feat(search): add filtering.");
        assert_eq!(result.error_kind(), Some(Kind::TrailingPeriod));
        assert_eq!(result.suggestions, ["feat(search): add filtering"]);
    }

    #[test]
    fn capitalization_checked_before_period() {
        let catalog = ConventionCatalog::standard();
        let result = engine(&catalog).validate("feat: Add filters.");
        assert_eq!(result.error_kind(), Some(Kind::SubjectCapitalized));
    }

    #[test]
    fn body_lines_are_ignored() {
        let catalog = ConventionCatalog::standard();
        let result = engine(&catalog).validate("feat: add filters\n\nLonger explanation here.");
        assert!(result.is_valid);
        let components = result.components.unwrap();
        assert_eq!(components.subject, "add filters");
        assert_eq!(components.raw, "feat: add filters\n\nLonger explanation here.");
    }

    // ── CommitMessageEngine::generate ────────────────────────────────

    #[test]
    fn generate_with_scope() {
        let catalog = ConventionCatalog::standard();
        let header = engine(&catalog)
            .generate("feat", "Add restaurant filtering by cuisine type", Some("search"))
            .unwrap();
        assert_eq!(header, "feat(search): add restaurant filtering by cuisine type");
    }

    #[test]
    fn generate_without_scope() {
        let catalog = ConventionCatalog::standard();
        let header = engine(&catalog)
            .generate("chore", "bump dependencies.", None)
            .unwrap();
        assert_eq!(header, "chore: bump dependencies");
    }

    #[test]
    fn generate_lowercases_scope_and_type() {
        let catalog = ConventionCatalog::standard();
        let header = engine(&catalog)
            .generate("Fix", "resolve crash", Some("Parser"))
            .unwrap();
        assert_eq!(header, "fix(parser): resolve crash");
    }

    #[test]
    fn generate_rejects_unknown_type() {
        let catalog = ConventionCatalog::standard();
        let error = engine(&catalog)
            .generate("feature", "add filters", None)
            .unwrap_err();
        assert_eq!(error.kind, Kind::UnknownType);
    }

    #[test]
    fn generate_rejects_empty_subject() {
        let catalog = ConventionCatalog::standard();
        let error = engine(&catalog).generate("feat", "   ", None).unwrap_err();
        assert_eq!(error.kind, Kind::EmptySubject);
        let error = engine(&catalog).generate("feat", "...", None).unwrap_err();
        assert_eq!(error.kind, Kind::EmptySubject);
    }

    #[test]
    fn generate_rejects_illegal_scope() {
        let catalog = ConventionCatalog::standard();
        let error = engine(&catalog)
            .generate("feat", "add filters", Some("se arch"))
            .unwrap_err();
        assert_eq!(error.kind, Kind::InvalidScope);
    }

    #[test]
    fn generate_output_validates() {
        let catalog = ConventionCatalog::standard();
        let e = engine(&catalog);
        let header = e
            .generate("refactor", "Split the parser module...", Some("core"))
            .unwrap();
        let result = e.validate(&header);
        assert!(result.is_valid);
        let components = result.components.unwrap();
        assert_eq!(components.commit_type, "refactor");
        assert_eq!(components.scope.as_deref(), Some("core"));
        assert_eq!(components.subject, "split the parser module");
    }

    // ── helpers ──────────────────────────────────────────────────────

    #[test]
    fn lowercase_first_handles_unicode() {
        assert_eq!(lowercase_first("Überholung planen"), "überholung planen");
        assert_eq!(lowercase_first("123 go"), "123 go");
        assert_eq!(lowercase_first(""), "");
    }

    #[test]
    fn canonical_render() {
        let components = CommitMessageComponents {
            commit_type: "perf".to_string(),
            scope: Some("index".to_string()),
            subject: "cache lookups".to_string(),
            raw: "perf(index): cache lookups".to_string(),
        };
        assert_eq!(components.canonical(), "perf(index): cache lookups");
    }

    // ── property tests ────────────────────────────────────────────

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn validate_never_panics(message in ".*") {
                let catalog = ConventionCatalog::standard();
                let _ = CommitMessageEngine::new(&catalog).validate(&message);
            }

            #[test]
            fn generated_messages_validate(subject in "[ -~]{1,60}") {
                let core = subject
                    .trim()
                    .trim_end_matches(|c: char| c == '.' || c.is_whitespace());
                prop_assume!(!core.is_empty());
                let catalog = ConventionCatalog::standard();
                let engine = CommitMessageEngine::new(&catalog);
                let message = engine
                    .generate("fix", &subject, Some("parser"))
                    .expect("non-empty subjects always generate");

                let result = engine.validate(&message);
                prop_assert!(result.is_valid, "generated '{}' failed validation", message);
            }

            #[test]
            fn validation_is_deterministic(message in ".*") {
                let catalog = ConventionCatalog::standard();
                let engine = CommitMessageEngine::new(&catalog);
                let first = engine.validate(&message);
                let second = engine.validate(&message);
                prop_assert_eq!(first.is_valid, second.is_valid);
                prop_assert_eq!(first.suggestions, second.suggestions);
            }
        }
    }
}

//! Validation outcome values shared by both engines.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category tag for a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// The mandatory separator of the grammar was not found.
    MissingSeparator,
    /// The type token is not in the catalog.
    UnknownType,
    /// The description is empty or not a well-formed slug.
    InvalidDescription,
    /// The scope is empty, unclosed, or contains illegal characters.
    InvalidScope,
    /// The subject is empty.
    EmptySubject,
    /// The subject starts with a capital letter.
    SubjectCapitalized,
    /// The subject ends with a period.
    TrailingPeriod,
}

/// A structured validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ValidationError {
    /// Failure category.
    pub kind: ValidationErrorKind,
    /// Human-readable explanation naming the expected grammar.
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Outcome of validating one input string.
///
/// `components` is present iff the input is valid; `error` is present iff it
/// is not. Suggestions are best-effort corrected candidates, closest first;
/// they are not guaranteed to be valid themselves.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult<C> {
    /// Whether the input conforms to the grammar.
    pub is_valid: bool,
    /// Parsed components; present only when valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<C>,
    /// Failure details; present only when invalid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationError>,
    /// Best-effort corrected candidates.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl<C> ValidationResult<C> {
    /// Builds a passing result.
    pub fn valid(components: C) -> Self {
        Self {
            is_valid: true,
            components: Some(components),
            error: None,
            suggestions: Vec::new(),
        }
    }

    /// Builds a failing result.
    pub fn invalid(error: ValidationError) -> Self {
        Self {
            is_valid: false,
            components: None,
            error: Some(error),
            suggestions: Vec::new(),
        }
    }

    /// Appends a suggestion when one could be computed.
    pub fn with_suggestion(mut self, suggestion: Option<String>) -> Self {
        if let Some(suggestion) = suggestion {
            self.suggestions.push(suggestion);
        }
        self
    }

    /// The failure category, when invalid.
    pub fn error_kind(&self) -> Option<ValidationErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}

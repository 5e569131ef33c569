use anyhow::Result;
use arc_flow::conventions::{
    BranchNameEngine, CommitMessageEngine, ConventionCatalog, IssueRef, ValidationErrorKind,
};
use arc_flow::Cli;
use clap::Parser;

/// The branch workflow end to end: an agent generates a name from issue
/// context, then the same name passes validation with identical parts.
#[test]
fn test_branch_generate_then_validate_round_trip() -> Result<()> {
    let catalog = ConventionCatalog::standard();
    let engine = BranchNameEngine::new(&catalog);

    let issue = IssueRef::new("PROJ", 456);
    let name = engine.generate("bugfix", "Fix map crash on annotation tap", Some(&issue))?;
    assert_eq!(name, "bugfix/PROJ-456-fix-map-crash-on-annotation-tap");

    let result = engine.validate(&name);
    assert!(result.is_valid);

    let components = result.components.expect("valid names carry components");
    assert_eq!(components.branch_type, "bugfix");
    assert_eq!(components.issue, Some(IssueRef::new("PROJ", 456)));
    assert_eq!(components.description, "fix-map-crash-on-annotation-tap");
    Ok(())
}

#[test]
fn test_branch_validation_classifies_common_mistakes() -> Result<()> {
    let catalog = ConventionCatalog::standard();
    let engine = BranchNameEngine::new(&catalog);

    let valid = engine.validate("feature/PROJ-123-user-authentication");
    assert!(valid.is_valid);
    let components = valid.components.expect("valid names carry components");
    assert_eq!(components.issue, Some(IssueRef::new("PROJ", 123)));

    let no_separator = engine.validate("add-search-feature");
    assert_eq!(
        no_separator.error.map(|e| e.kind),
        Some(ValidationErrorKind::MissingSeparator)
    );

    let bad_type = engine.validate("feat/PROJ-1-search");
    assert_eq!(
        bad_type.error.map(|e| e.kind),
        Some(ValidationErrorKind::UnknownType)
    );
    assert!(bad_type
        .suggestions
        .iter()
        .any(|s| s.starts_with("feature/")));

    let bad_description = engine.validate("feature/Add Search");
    assert_eq!(
        bad_description.error.map(|e| e.kind),
        Some(ValidationErrorKind::InvalidDescription)
    );
    Ok(())
}

/// The commit workflow end to end, mirroring how a pull request title is
/// checked before GitHub sees it.
#[test]
fn test_commit_generate_then_validate_round_trip() -> Result<()> {
    let catalog = ConventionCatalog::standard();
    let engine = CommitMessageEngine::new(&catalog);

    let message = engine.generate("feat", "Add search filtering", Some("search"))?;
    assert_eq!(message, "feat(search): add search filtering");

    let result = engine.validate(&message);
    assert!(result.is_valid);

    let components = result.components.expect("valid messages carry components");
    assert_eq!(components.commit_type, "feat");
    assert_eq!(components.scope.as_deref(), Some("search"));
    assert_eq!(components.subject, "add search filtering");
    Ok(())
}

#[test]
fn test_commit_validation_classifies_common_mistakes() -> Result<()> {
    let catalog = ConventionCatalog::standard();
    let engine = CommitMessageEngine::new(&catalog);

    let no_separator = engine.validate("Added new search feature");
    assert_eq!(
        no_separator.error.map(|e| e.kind),
        Some(ValidationErrorKind::MissingSeparator)
    );

    let trailing_period = engine.validate("feat(search): add filtering.");
    assert_eq!(
        trailing_period.error.as_ref().map(|e| e.kind),
        Some(ValidationErrorKind::TrailingPeriod)
    );
    assert!(trailing_period
        .suggestions
        .contains(&"feat(search): add filtering".to_string()));

    let capitalized = engine.validate("fix: Repair the build");
    assert_eq!(
        capitalized.error.map(|e| e.kind),
        Some(ValidationErrorKind::SubjectCapitalized)
    );

    let unknown_type = engine.validate("feature: add search");
    assert_eq!(
        unknown_type.error.map(|e| e.kind),
        Some(ValidationErrorKind::UnknownType)
    );
    assert!(unknown_type
        .suggestions
        .contains(&"feat: add search".to_string()));
    Ok(())
}

/// Suggestions are best-effort guidance; whenever one is produced for
/// these common mistakes it must itself pass validation.
#[test]
fn test_suggestions_for_common_mistakes_are_compliant() -> Result<()> {
    let catalog = ConventionCatalog::standard();
    let branch_engine = BranchNameEngine::new(&catalog);
    let commit_engine = CommitMessageEngine::new(&catalog);

    for name in ["feat/PROJ-1-search", "Add Search", "feature/Add Search"] {
        for suggestion in branch_engine.validate(name).suggestions {
            assert!(
                branch_engine.validate(&suggestion).is_valid,
                "suggestion '{suggestion}' for '{name}' is not compliant"
            );
        }
    }

    for message in [
        "feat(search): add filtering.",
        "fix: Repair the build",
        "feature: add search",
    ] {
        for suggestion in commit_engine.validate(message).suggestions {
            assert!(
                commit_engine.validate(&suggestion).is_valid,
                "suggestion '{suggestion}' for '{message}' is not compliant"
            );
        }
    }
    Ok(())
}

/// Every catalog token works as the type of a minimal well-formed example.
#[test]
fn test_every_catalog_type_validates_in_a_minimal_example() {
    let catalog = ConventionCatalog::standard();
    let branch_engine = BranchNameEngine::new(&catalog);
    let commit_engine = CommitMessageEngine::new(&catalog);

    for branch_type in catalog.branch_types() {
        let name = format!("{branch_type}/minimal-example");
        assert!(
            branch_engine.validate(&name).is_valid,
            "'{name}' should be valid"
        );
    }
    for commit_type in catalog.commit_types() {
        let message = format!("{commit_type}: minimal example");
        assert!(
            commit_engine.validate(&message).is_valid,
            "'{message}' should be valid"
        );
    }
}

/// Re-generating from an already-canonical description changes nothing.
#[test]
fn test_generation_is_idempotent_on_canonical_descriptions() -> Result<()> {
    let catalog = ConventionCatalog::standard();
    let engine = BranchNameEngine::new(&catalog);

    let first = engine.generate("feature", "Add user authentication!", None)?;
    let description = first.split_once('/').expect("generated names have a slash").1;
    let second = engine.generate("feature", description, None)?;
    assert_eq!(first, second);
    Ok(())
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any input without the mandatory separator is always classified
        /// as `MissingSeparator`, never anything else.
        #[test]
        fn branch_rejection_is_monotonic(input in "[^/]*") {
            let catalog = ConventionCatalog::standard();
            let result = BranchNameEngine::new(&catalog).validate(&input);
            prop_assert_eq!(
                result.error.map(|e| e.kind),
                Some(ValidationErrorKind::MissingSeparator)
            );
        }

        #[test]
        fn commit_rejection_is_monotonic(input in "[^:(\\r\\n]*") {
            let catalog = ConventionCatalog::standard();
            let result = CommitMessageEngine::new(&catalog).validate(&input);
            prop_assert_eq!(
                result.error.map(|e| e.kind),
                Some(ValidationErrorKind::MissingSeparator)
            );
        }

        /// Suggestions, when produced, are well-formed printable strings.
        #[test]
        fn suggestions_are_well_formed(input in ".{0,60}") {
            let catalog = ConventionCatalog::standard();
            for suggestion in BranchNameEngine::new(&catalog).validate(&input).suggestions {
                prop_assert!(!suggestion.is_empty());
            }
            for suggestion in CommitMessageEngine::new(&catalog).validate(&input).suggestions {
                prop_assert!(!suggestion.is_empty());
            }
        }
    }
}

// ── CLI parsing ──────────────────────────────────────────────────────

#[test]
fn test_cli_parses_branch_validate() -> Result<()> {
    let cli = Cli::try_parse_from([
        "arc-flow",
        "branch",
        "validate",
        "feature/PROJ-123-user-authentication",
    ])?;
    match cli.command {
        arc_flow::cli::Commands::Branch(_) => {}
        _ => panic!("expected branch command"),
    }
    Ok(())
}

#[test]
fn test_cli_parses_issue_create_with_labels() -> Result<()> {
    let cli = Cli::try_parse_from([
        "arc-flow", "issue", "create", "PROJ", "--title", "Add search", "--label", "backend",
        "--label", "search",
    ])?;
    match cli.command {
        arc_flow::cli::Commands::Issue(issue) => match issue.command {
            arc_flow::cli::issue::IssueSubcommands::Create(create) => {
                assert_eq!(create.team, "PROJ");
                assert_eq!(create.labels, vec!["backend", "search"]);
            }
            _ => panic!("expected issue create"),
        },
        _ => panic!("expected issue command"),
    }
    Ok(())
}

#[test]
fn test_cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["arc-flow", "frobnicate"]).is_err());
}

//! Target validation tests

use dler_core::{DistTarget, TargetError, validate_targets};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn wildcard_with_specific_library_conflicts() {
    let err = validate_targets(&["dist-libs/foo", "dist-libs"]).unwrap_err();
    assert_eq!(
        err,
        TargetError::Conflict {
            wildcard: "dist-libs".to_string(),
            specific: "dist-libs/foo".to_string(),
        }
    );
}

#[test]
fn duplicate_flat_target_is_rejected() {
    let err = validate_targets(&["dist-npm", "dist-npm"]).unwrap_err();
    assert_eq!(err, TargetError::DuplicateTarget("dist-npm".to_string()));
}

#[test]
fn duplicate_library_is_rejected() {
    let err = validate_targets(&["dist-libs/foo", "dist-libs/foo"]).unwrap_err();
    assert_eq!(err, TargetError::DuplicateLibrary("foo".to_string()));
}

#[rstest]
#[case("dist")]
#[case("dist-deno")]
#[case("src")]
#[case("")]
#[case("dist-libs/a/b")]
fn invalid_targets(#[case] raw: &str) {
    assert!(matches!(
        validate_targets(&[raw]),
        Err(TargetError::InvalidTarget(_))
    ));
}

#[test]
fn empty_library_name() {
    assert_eq!(
        validate_targets(&["dist-libs/"]),
        Err(TargetError::EmptyLibraryName("dist-libs/".to_string()))
    );
}

#[test]
fn order_is_preserved() {
    let targets = validate_targets(&["dist-libs/b", "dist-jsr", "dist-libs/a", "dist-npm"]).unwrap();
    assert_eq!(
        targets,
        vec![
            DistTarget::Library("b".to_string()),
            DistTarget::Jsr,
            DistTarget::Library("a".to_string()),
            DistTarget::Npm,
        ]
    );
}

#[test]
fn empty_list_is_valid() {
    let targets = validate_targets::<&str>(&[]).unwrap();
    assert!(targets.is_empty());
}

#[test]
fn error_messages_name_the_target() {
    let err = validate_targets(&["dist-libs", "dist-libs/sdk"]).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("dist-libs/sdk"), "{message}");
}

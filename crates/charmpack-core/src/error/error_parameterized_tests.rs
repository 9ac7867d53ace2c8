#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// ============================================================================
// Parameterized exit code mapping tests
// ============================================================================

#[test_case(PackError::InvalidOptionCombination { flag: "-e/--entry" }, 1; "invalid option")]
#[test_case(PackError::MissingMandatoryFile("README.md".into()), 1; "missing mandatory")]
#[test_case(PackError::StagingFailure("f.txt".into()), 1; "staging failure")]
#[test_case(PackError::MissingOrInvalidDescriptor("bundle.yaml".into()), 1; "invalid descriptor")]
#[test_case(PackError::MissingRequiredField("bundle.yaml".into()), 1; "missing name")]
#[test_case(PackError::InvalidArchiveName("../x".into()), 1; "bad archive name")]
#[test_case(PackError::InvalidPattern { pattern: "[".into(), reason: "x".into() }, 1; "bad pattern")]
#[test_case(PackError::InvalidConfig { path: "c.yaml".into(), reason: "x".into() }, 1; "bad config")]
#[test_case(PackError::UnsupportedEnvironment, 2; "unsupported env")]
#[test_case(PackError::InvalidEnvironmentFlag { name: "X", value: "maybe".into() }, 2; "bad flag")]
#[test_case(PackError::BuildFailed("boom".into()), 3; "build failed")]
#[test_case(PackError::Io(std::io::Error::other("x")), 3; "io")]
fn PackError___variant___maps_to_exit_code(error: PackError, expected: u8) {
    assert_eq!(error.exit_code(), expected);
}

#[test_case("CHARMCRAFT_DEVELOPER", "maybe")]
#[test_case("CHARMCRAFT_MANAGED_MODE", "2")]
fn PackError___invalid_environment_flag___names_variable_and_value(name: &'static str, value: &str) {
    let err = PackError::InvalidEnvironmentFlag {
        name,
        value: value.to_string(),
    };

    assert_eq!(
        err.to_string(),
        format!("Invalid value '{value}' for environment variable {name}.")
    );
}

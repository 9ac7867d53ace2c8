#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// ============================================================================
// Parameterized configuration file parsing tests
// ============================================================================

#[test_case("type: charm", Some(ProjectKind::Charm))]
#[test_case("type: bundle", Some(ProjectKind::Bundle))]
#[test_case("type: snap", None; "unknown type")]
#[test_case("type: Charm", None; "type is case sensitive")]
#[test_case("type: [charm]", None; "type must be a scalar")]
fn ProjectConfig___type_field___parses_or_rejects(yaml: &str, expected: Option<ProjectKind>) {
    let temp_dir = tempfile::TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(CONFIG_FILE), yaml).unwrap();

    let result = ProjectConfig::load(temp_dir.path(), Utc::now());

    match expected {
        Some(kind) => assert_eq!(result.unwrap().kind, Some(kind)),
        None => assert!(matches!(result, Err(PackError::InvalidConfig { .. }))),
    }
}

#[test_case("type: bundle\nparts: {}", 0)]
#[test_case("type: bundle\nparts:\n  bundle: {}", 0)]
#[test_case("type: bundle\nparts:\n  bundle:\n    prime: [a]", 1)]
#[test_case("type: bundle\nparts:\n  bundle:\n    prime: [a, 'b/**/*', c]", 3)]
fn ProjectConfig___prime_section___defaults_to_empty(yaml: &str, expected_len: usize) {
    let temp_dir = tempfile::TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(CONFIG_FILE), yaml).unwrap();

    let config = ProjectConfig::load(temp_dir.path(), Utc::now()).unwrap();

    assert_eq!(config.parts.bundle.prime.len(), expected_len);
}

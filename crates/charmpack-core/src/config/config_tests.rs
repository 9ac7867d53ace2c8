#![allow(non_snake_case)]

use super::*;
use std::fs;
use tempfile::TempDir;

fn started() -> DateTime<Utc> {
    Utc::now()
}

#[test]
fn ProjectConfig___load___without_file_is_unconfigured() {
    let temp_dir = TempDir::new().unwrap();

    let config = ProjectConfig::load(temp_dir.path(), started()).unwrap();

    assert_eq!(config.kind, None);
    assert!(!config.project.config_provided);
    assert!(config.parts.bundle.prime.is_empty());
    assert_eq!(config.project_dir(), temp_dir.path());
}

#[test]
fn ProjectConfig___load___reads_bundle_type_and_prime() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(CONFIG_FILE),
        "type: bundle\nparts:\n  bundle:\n    prime:\n      - lib/**/*.txt\n      - extra.md\n",
    )
    .unwrap();

    let config = ProjectConfig::load(temp_dir.path(), started()).unwrap();

    assert_eq!(config.kind, Some(ProjectKind::Bundle));
    assert!(config.project.config_provided);
    assert_eq!(config.parts.bundle.prime, vec!["lib/**/*.txt", "extra.md"]);
}

#[test]
fn ProjectConfig___load___ignores_unknown_keys() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(CONFIG_FILE),
        "type: charm\nbases:\n  - name: ubuntu\n",
    )
    .unwrap();

    let config = ProjectConfig::load(temp_dir.path(), started()).unwrap();

    assert_eq!(config.kind, Some(ProjectKind::Charm));
}

#[test]
fn ProjectConfig___load___missing_type_is_invalid() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(CONFIG_FILE), "parts: {}\n").unwrap();

    let err = ProjectConfig::load(temp_dir.path(), started()).unwrap_err();

    assert!(matches!(err, PackError::InvalidConfig { .. }));
    assert!(
        err.to_string()
            .starts_with(&format!("Invalid charmcraft.yaml file '{}'", temp_dir.path().join(CONFIG_FILE).display()))
    );
}

#[test]
fn ProjectConfig___load___records_start_time() {
    let temp_dir = TempDir::new().unwrap();
    let started_at = started();

    let config = ProjectConfig::load(temp_dir.path(), started_at).unwrap();

    assert_eq!(config.project.started_at, started_at);
}

#[test]
fn ProjectConfig___prime___replaces_patterns() {
    let config = ProjectConfig::with_kind(ProjectKind::Bundle, "/tmp/p", started())
        .prime(["a.txt", "*.md"]);

    assert_eq!(config.parts.bundle.prime, vec!["a.txt", "*.md"]);
    assert!(config.project.config_provided);
}

#[test]
fn ProjectKind___display___is_lowercase() {
    assert_eq!(ProjectKind::Charm.to_string(), "charm");
    assert_eq!(ProjectKind::Bundle.to_string(), "bundle");
}

#![allow(non_snake_case)]

use super::*;
use std::fs;
use tempfile::TempDir;

fn request(from: &std::path::Path) -> BuildRequest {
    BuildRequest {
        from: from.to_path_buf(),
        requirement: vec![PathBuf::from("reqs.txt")],
        entrypoint: Some(PathBuf::from("src/charm.py")),
        bases_indices: vec![0, 2],
        destructive_mode: true,
        force: false,
    }
}

// BuildRequest tests

#[test]
fn BuildRequest___serializes_with_orchestrator_field_names() {
    let request = request(std::path::Path::new("/proj"));

    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(
        value,
        serde_json::json!({
            "from": "/proj",
            "requirement": ["reqs.txt"],
            "entrypoint": "src/charm.py",
            "bases_indices": [0, 2],
            "destructive_mode": true,
            "force": false,
        })
    );
}

// parse_staged tests

#[test]
fn parse_staged___one_record_per_line___relative_dirs_resolved() {
    let request = request(std::path::Path::new("/proj"));
    let stdout = b"{\"name\":\"a\",\"staged_dir\":\"build/a\"}\n\n{\"name\":\"b\",\"staged_dir\":\"/abs/b\"}\n";

    let staged = parse_staged(stdout, &request).unwrap();

    assert_eq!(
        staged,
        vec![
            StagedCharm {
                name: "a".to_string(),
                staged_dir: PathBuf::from("/proj/build/a"),
            },
            StagedCharm {
                name: "b".to_string(),
                staged_dir: PathBuf::from("/abs/b"),
            },
        ]
    );
}

#[test]
fn parse_staged___malformed_line___reports_build_failure() {
    let request = request(std::path::Path::new("/proj"));

    let err = parse_staged(b"{\"name\":\"a\"}\n", &request).unwrap_err();

    assert!(matches!(err, PackError::BuildFailed(_)));
    assert!(err.to_string().starts_with("Charm build failed: invalid builder output on line 1:"));
}

#[test]
fn parse_staged___empty_output___reports_build_failure() {
    let request = request(std::path::Path::new("/proj"));

    let err = parse_staged(b"\n", &request).unwrap_err();

    assert_eq!(err.to_string(), "Charm build failed: no charm was staged.");
}

// ExternalBuilder tests

#[test]
fn ExternalBuilder___from_env___uses_variable_or_default() {
    let set = Environment::from_vars([(BUILDER_VAR, "/opt/my-builder")], "linux");
    let unset = Environment::from_vars(Vec::<(String, String)>::new(), "linux");

    assert_eq!(ExternalBuilder::from_env(&set).program, "/opt/my-builder");
    assert_eq!(ExternalBuilder::from_env(&unset).program, DEFAULT_BUILDER);
}

#[test]
fn ExternalBuilder___from_env___splits_arguments() {
    let env = Environment::from_vars([(BUILDER_VAR, "python3 -m builder")], "linux");

    let builder = ExternalBuilder::from_env(&env);

    assert_eq!(builder.program, "python3");
    assert_eq!(builder.args, vec![OsString::from("-m"), OsString::from("builder")]);
}

#[test]
fn ExternalBuilder___from_env___blank_value_uses_default() {
    let env = Environment::from_vars([(BUILDER_VAR, "  ")], "linux");

    let builder = ExternalBuilder::from_env(&env);

    assert_eq!(builder.program, DEFAULT_BUILDER);
    assert!(builder.args.is_empty());
}

#[test]
fn ExternalBuilder___missing_program___reports_build_failure() {
    let temp_dir = TempDir::new().unwrap();
    let builder = ExternalBuilder::new("charmpack-test-no-such-builder");

    let err = builder.build(&request(temp_dir.path())).unwrap_err();

    assert!(matches!(err, PackError::BuildFailed(_)));
    assert!(err.to_string().contains("cannot run 'charmpack-test-no-such-builder'"));
}

#[cfg(unix)]
#[test]
fn ExternalBuilder___receives_request_and_returns_staged_dirs() {
    let temp_dir = TempDir::new().unwrap();
    let builder = ExternalBuilder::new("sh").args([
        "-c",
        "cat > request.json; echo '{\"name\":\"mycharm_ubuntu-22.04-amd64\",\"staged_dir\":\"stage\"}'",
    ]);
    let request = request(temp_dir.path());

    let staged = builder.build(&request).unwrap();

    assert_eq!(
        staged,
        vec![StagedCharm {
            name: "mycharm_ubuntu-22.04-amd64".to_string(),
            staged_dir: temp_dir.path().join("stage"),
        }]
    );
    let sent: BuildRequest =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join("request.json")).unwrap())
            .unwrap();
    assert_eq!(sent, request);
}

#[cfg(unix)]
#[test]
fn ExternalBuilder___non_zero_exit___reports_build_failure() {
    let temp_dir = TempDir::new().unwrap();
    let builder = ExternalBuilder::new("sh").args(["-c", "cat > /dev/null; exit 3"]);

    let err = builder.build(&request(temp_dir.path())).unwrap_err();

    assert!(matches!(err, PackError::BuildFailed(_)));
    assert!(err.to_string().starts_with("Charm build failed: 'sh' failed ("));
}

mod common;

use std::fs;
use std::path::PathBuf;

use common::{fixtures, load_into};
use nvi_rs::{CONFIG_FILE, ConfigError, MemoryStore, load_config};
use tempfile::TempDir;

#[test]
fn loads_environment_from_fixtures() {
    let options = load_config("test", Some(&fixtures())).expect("should load config");
    assert_eq!(options.directory, Some(PathBuf::from("tests/fixtures")));
    assert_eq!(options.files, vec!["base.env", "reference.env"]);
    assert_eq!(options.required, vec!["REFERENCE"]);
    assert!(!options.override_existing);
}

#[test]
fn configured_environment_loads() {
    // The configured directory is relative to the crate root.
    let mut options = load_config("test", Some(&fixtures())).expect("should load config");
    options.directory = Some(fixtures());
    let (result, _) = load_into(&options, &mut MemoryStore::new());
    assert_eq!(result.expect("should load").get("REFERENCE"), Some("hello"));
}

#[test]
fn configured_required_key_missing() {
    let mut options = load_config("missing", Some(&fixtures())).expect("should load config");
    options.directory = Some(fixtures());
    let (result, _) = load_into(&options, &mut MemoryStore::new());
    assert!(matches!(result, Err(nvi_rs::Error::RequiredKeyMissing(_))));
}

#[test]
fn environment_without_files_is_rejected() {
    let err = load_config("empty", Some(&fixtures())).unwrap_err();
    assert!(matches!(err, ConfigError::NoFiles { .. }));
}

#[test]
fn unknown_environment() {
    let err = load_config("staging", Some(&fixtures())).unwrap_err();
    assert!(matches!(err, ConfigError::EnvironmentNotFound { .. }));
}

#[test]
fn missing_config_file() {
    let dir = TempDir::new().expect("create temp dir");
    let err = load_config("test", Some(dir.path())).unwrap_err();
    let ConfigError::Read { path, .. } = err else {
        panic!("expected a read error");
    };
    assert_eq!(path, dir.path().join(CONFIG_FILE));
}

#[test]
fn invalid_config_file() {
    let dir = TempDir::new().expect("create temp dir");
    fs::write(dir.path().join(CONFIG_FILE), "{\"test\": ").expect("write config");
    let err = load_config("test", Some(dir.path())).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("valid JSON"));
}

#[test]
fn unknown_encoding_is_rejected() {
    let dir = TempDir::new().expect("create temp dir");
    fs::write(
        dir.path().join(CONFIG_FILE),
        r#"{"test": {"files": [".env"], "encoding": "ebcdic"}}"#,
    )
    .expect("write config");
    let err = load_config("test", Some(dir.path())).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

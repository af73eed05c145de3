//! Unit tests for database path resolution
//!
//! Uses serial_test to prevent environment variable races: every test that
//! touches the resolver's variable is marked #[serial].

use eaf2txt_common::config::{resolve_database_path_from, TomlConfig};
use eaf2txt_common::Error;
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TEST_ENV_VAR: &str = "EAF2TXT_TEST_DATABASE";

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
#[serial]
fn test_cli_argument_wins() {
    env::set_var(TEST_ENV_VAR, "/tmp/from-env.sqlite");
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "database = \"/tmp/from-toml.sqlite\"\n");

    let resolved = resolve_database_path_from(
        Some(Path::new("/tmp/from-cli.sqlite")),
        TEST_ENV_VAR,
        Some(&config),
    )
    .unwrap();

    assert_eq!(resolved, Some(PathBuf::from("/tmp/from-cli.sqlite")));
    env::remove_var(TEST_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_beats_config_file() {
    env::set_var(TEST_ENV_VAR, "/tmp/from-env.sqlite");
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "database = \"/tmp/from-toml.sqlite\"\n");

    let resolved = resolve_database_path_from(None, TEST_ENV_VAR, Some(&config)).unwrap();

    assert_eq!(resolved, Some(PathBuf::from("/tmp/from-env.sqlite")));
    env::remove_var(TEST_ENV_VAR);
}

#[test]
#[serial]
fn test_empty_env_var_is_ignored() {
    env::set_var(TEST_ENV_VAR, "");
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "database = \"/tmp/from-toml.sqlite\"\n");

    let resolved = resolve_database_path_from(None, TEST_ENV_VAR, Some(&config)).unwrap();

    assert_eq!(resolved, Some(PathBuf::from("/tmp/from-toml.sqlite")));
    env::remove_var(TEST_ENV_VAR);
}

#[test]
#[serial]
fn test_config_file_without_database_key() {
    env::remove_var(TEST_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "# nothing configured\n");

    let resolved = resolve_database_path_from(None, TEST_ENV_VAR, Some(&config)).unwrap();

    assert_eq!(resolved, None);
}

#[test]
#[serial]
fn test_missing_config_file_resolves_to_none() {
    env::remove_var(TEST_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("does-not-exist.toml");

    let resolved = resolve_database_path_from(None, TEST_ENV_VAR, Some(&config)).unwrap();

    assert_eq!(resolved, None);
}

#[test]
#[serial]
fn test_invalid_config_file_is_an_error() {
    env::remove_var(TEST_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "database = [unterminated\n");

    let err = resolve_database_path_from(None, TEST_ENV_VAR, Some(&config)).unwrap_err();

    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_toml_config_load() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "database = \"annotations.sqlite\"\n");

    let parsed = TomlConfig::load(&config).unwrap();

    assert_eq!(parsed.database, Some(PathBuf::from("annotations.sqlite")));
}

//! Integration tests for configuration resolution and graceful degradation
//!
//! Covers:
//! - Missing TOML files SHALL NOT cause termination
//! - Malformed TOML files are reported as configuration errors
//! - Priority order CLI → ENV → TOML → default
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.

use eniguity_common::config::{
    load_toml_config, resolve_setting, resolve_toml_config, TomlConfig, CONFIG_PATH_ENV,
};
use eniguity_common::Error;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_missing_file_loads_as_none() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");

    let loaded = load_toml_config(&path).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn test_full_file_round_trips_fields() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
root_folder = "/srv/eniguity"
database_name = "garage"
bind_address = "0.0.0.0:9000"
max_upload_bytes = 1048576

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = load_toml_config(&path).unwrap().unwrap();
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/eniguity")));
    assert_eq!(config.database_name.as_deref(), Some("garage"));
    assert_eq!(config.bind_address.as_deref(), Some("0.0.0.0:9000"));
    assert_eq!(config.max_upload_bytes, Some(1_048_576));
    assert!(config.database_url.is_none());
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_malformed_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "database_name = [unterminated").unwrap();

    let err = load_toml_config(&path).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
#[serial]
fn test_env_path_is_used_when_no_cli_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("from_env.toml");
    std::fs::write(&path, "database_name = \"from_env\"").unwrap();

    env::set_var(CONFIG_PATH_ENV, &path);
    let config = resolve_toml_config(None).unwrap();
    env::remove_var(CONFIG_PATH_ENV);

    assert_eq!(config.database_name.as_deref(), Some("from_env"));
}

#[test]
#[serial]
fn test_missing_explicit_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nope.toml");

    let config = resolve_toml_config(Some(&path)).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
#[serial]
fn test_env_var_beats_toml_value() {
    env::set_var("ENIGUITY_TEST_BIND", "10.0.0.1:1234");
    let value = resolve_setting(
        None,
        "ENIGUITY_TEST_BIND",
        Some("127.0.0.1:1".to_string()),
        "127.0.0.1:2".to_string(),
    )
    .unwrap();
    env::remove_var("ENIGUITY_TEST_BIND");

    assert_eq!(value, "10.0.0.1:1234");
}

#[test]
#[serial]
fn test_unparseable_env_var_is_rejected() {
    env::set_var("ENIGUITY_TEST_LIMIT", "lots");
    let result = resolve_setting::<usize>(None, "ENIGUITY_TEST_LIMIT", None, 10);
    env::remove_var("ENIGUITY_TEST_LIMIT");

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_default_used_when_nothing_set() {
    env::remove_var("ENIGUITY_TEST_NOTHING");
    let value = resolve_setting::<usize>(None, "ENIGUITY_TEST_NOTHING", None, 42).unwrap();
    assert_eq!(value, 42);
}

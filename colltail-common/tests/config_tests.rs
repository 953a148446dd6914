//! Unit tests for configuration and graceful degradation
//!
//! Tests:
//! - Missing config files do not cause failure
//! - Malformed config files fall back to defaults
//! - Priority order for data file resolution
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate COLLTAIL_DATA are marked with #[serial].

use colltail_common::config::{
    load_toml_config, CompiledDefaults, DataFileResolver, LoggingConfig, TomlConfig, DATA_FILE_ENV,
};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_compiled_defaults_for_current_platform() {
    let defaults = CompiledDefaults::for_current_platform();

    assert!(!defaults.data_file.as_os_str().is_empty());
    assert_eq!(defaults.tree, "coll");
    assert_eq!(defaults.log_level, "info");
    assert!(defaults.data_file.ends_with("tree.toml"));
}

#[test]
#[serial]
fn test_env_var_used_without_cli_arg() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "data_file = \"/from/config.toml\"\n");

    env::set_var(DATA_FILE_ENV, "/tmp/colltail-env-tree.toml");
    let resolver = DataFileResolver::with_config_file(&config);
    let path = resolver.resolve(None);
    env::remove_var(DATA_FILE_ENV);

    assert_eq!(path, PathBuf::from("/tmp/colltail-env-tree.toml"));
}

#[test]
#[serial]
fn test_cli_arg_beats_env_var() {
    env::set_var(DATA_FILE_ENV, "/tmp/colltail-env-tree.toml");
    let path = DataFileResolver::new().resolve(Some(Path::new("/tmp/cli-tree.toml")));
    env::remove_var(DATA_FILE_ENV);

    assert_eq!(path, PathBuf::from("/tmp/cli-tree.toml"));
}

#[test]
#[serial]
fn test_config_file_used_when_env_unset() {
    env::remove_var(DATA_FILE_ENV);
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "data_file = \"/from/config.toml\"\n");

    let path = DataFileResolver::with_config_file(&config).resolve(None);

    assert_eq!(path, PathBuf::from("/from/config.toml"));
}

#[test]
#[serial]
fn test_missing_config_file_uses_default() {
    env::remove_var(DATA_FILE_ENV);
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist.toml");

    let resolver = DataFileResolver::with_config_file(&missing);
    assert_eq!(resolver.load_config(), TomlConfig::default());
    assert_eq!(
        resolver.resolve(None),
        CompiledDefaults::for_current_platform().data_file
    );
}

#[test]
#[serial]
fn test_malformed_config_file_uses_default() {
    env::remove_var(DATA_FILE_ENV);
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "data_file = [unterminated\n");

    let resolver = DataFileResolver::with_config_file(&config);
    assert_eq!(resolver.load_config(), TomlConfig::default());
}

#[test]
fn test_load_toml_config_reports_parse_error() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "tree = 5\n");

    let err = load_toml_config(&config).unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}

#[test]
fn test_logging_section_parsed() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "[logging]\nlevel = \"trace\"\n");

    let parsed = load_toml_config(&config).unwrap();
    assert_eq!(
        parsed.logging,
        LoggingConfig {
            level: "trace".to_string()
        }
    );
    assert_eq!(parsed.tree, "coll");
    assert_eq!(parsed.data_file, None);
}

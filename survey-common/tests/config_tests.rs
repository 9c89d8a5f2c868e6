//! Configuration file loading and store URL resolution
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate the store URL variables are marked with #[serial].

use serial_test::serial;
use std::env;
use std::fs;
use survey_common::config::{resolve_database_url, DatabaseConfig, TomlConfig};
use survey_common::pipeline::UnmatchedLabelPolicy;
use survey_common::Error;
use tempfile::TempDir;

const TEST_URL_ENV: &str = "SURVEY_TEST_DATABASE_URL";

fn db_config(secrets: Option<std::path::PathBuf>) -> DatabaseConfig {
    DatabaseConfig {
        url_env: TEST_URL_ENV.to_string(),
        secrets_file: secrets,
        ..DatabaseConfig::default()
    }
}

#[test]
fn test_load_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[server]
bind = "0.0.0.0:8080"

[database]
table = "respostas_questionario"
connect_timeout_secs = 3

[dashboard]
frequency_vocabulary = ["Never", "Sometimes", "Always"]
unmatched_labels = { mode = "bucket", label = "Other" }

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = TomlConfig::load(Some(&path)).unwrap();
    assert_eq!(config.server.bind, "0.0.0.0:8080");
    assert_eq!(config.database.table, "respostas_questionario");
    assert_eq!(config.database.connect_timeout_secs, 3);
    assert_eq!(config.database.freshness_window_secs, 600);
    assert_eq!(config.dashboard.frequency_vocabulary.len(), 3);
    assert_eq!(
        config.dashboard.unmatched_labels,
        UnmatchedLabelPolicy::Bucket("Other".to_string())
    );
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_explicit_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let result = TomlConfig::load(Some(&dir.path().join("nope.toml")));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_malformed_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[database\ntable = ").unwrap();
    assert!(matches!(TomlConfig::load(Some(&path)), Err(Error::Config(_))));
}

#[test]
fn test_invalid_table_in_file_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[database]\ntable = \"x; DROP TABLE y\"\n").unwrap();
    assert!(matches!(TomlConfig::load(Some(&path)), Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_url_from_environment_wins() {
    let dir = TempDir::new().unwrap();
    let secrets = dir.path().join("secrets.toml");
    fs::write(&secrets, "[postgres]\nurl = \"postgres://from-file/db\"\n").unwrap();

    env::set_var(TEST_URL_ENV, "postgres://from-env/db");
    let url = resolve_database_url(&db_config(Some(secrets)));
    env::remove_var(TEST_URL_ENV);

    assert_eq!(url.unwrap(), "postgres://from-env/db");
}

#[test]
#[serial]
fn test_url_from_secrets_file() {
    env::remove_var(TEST_URL_ENV);
    let dir = TempDir::new().unwrap();
    let secrets = dir.path().join("secrets.toml");
    fs::write(&secrets, "[postgres]\nurl = \"postgres://from-file/db\"\n").unwrap();

    let url = resolve_database_url(&db_config(Some(secrets))).unwrap();
    assert_eq!(url, "postgres://from-file/db");
}

#[test]
#[serial]
fn test_missing_url_is_connection_error() {
    env::remove_var(TEST_URL_ENV);
    let dir = TempDir::new().unwrap();
    let secrets = dir.path().join("secrets.toml");
    fs::write(&secrets, "[other]\nkey = 1\n").unwrap();

    match resolve_database_url(&db_config(Some(secrets))) {
        Err(Error::Connection(msg)) => assert!(msg.contains(TEST_URL_ENV)),
        other => panic!("expected connection error, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_blank_env_value_ignored() {
    env::set_var(TEST_URL_ENV, "   ");
    let dir = TempDir::new().unwrap();
    let secrets = dir.path().join("missing-secrets.toml");

    let result = resolve_database_url(&db_config(Some(secrets)));
    env::remove_var(TEST_URL_ENV);

    assert!(matches!(result, Err(Error::Connection(_))));
}

//! Configuration loading and store credential resolution
//!
//! Bootstrap configuration comes from a TOML file; every field has a
//! built-in default, and a missing default-location file is not fatal.
//!
//! The store URL is never part of this file. It is resolved by
//! [`resolve_database_url`] in priority order:
//! 1. Environment variable (`SURVEY_DATABASE_URL` unless renamed)
//! 2. Secrets TOML file (`[postgres] url = "..."`)

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::pipeline::UnmatchedLabelPolicy;
use crate::{Error, Result};

/// Default environment variable holding the store URL
pub const DEFAULT_DATABASE_URL_ENV: &str = "SURVEY_DATABASE_URL";

/// Application directory name under the platform config dir
const APP_DIR: &str = "survey-dash";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// Store access configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Name of the environment variable holding the store URL
    #[serde(default = "default_url_env")]
    pub url_env: String,

    /// Secrets file with a `[postgres] url` entry (optional)
    ///
    /// Default: `<config dir>/survey-dash/secrets.toml`
    #[serde(default)]
    pub secrets_file: Option<PathBuf>,

    /// Survey response table
    #[serde(default = "default_table")]
    pub table: String,

    /// How long a fetched snapshot is reused
    #[serde(default = "default_freshness_window_secs")]
    pub freshness_window_secs: u64,

    /// Upper bound on opening a store connection
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Upper bound on running the query once connected
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,
}

/// Aggregation settings for the dashboard
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Ordered answer scale for the frequency questions
    #[serde(default = "default_frequency_vocabulary")]
    pub frequency_vocabulary: Vec<String>,

    /// Handling of answers outside `frequency_vocabulary`
    #[serde(default)]
    pub unmatched_labels: UnmatchedLabelPolicy,

    /// Separator of the multi-value columns
    #[serde(default = "default_tag_delimiter")]
    pub tag_delimiter: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_bind() -> String {
    "127.0.0.1:5730".to_string()
}

fn default_url_env() -> String {
    DEFAULT_DATABASE_URL_ENV.to_string()
}

fn default_table() -> String {
    "survey_responses".to_string()
}

fn default_freshness_window_secs() -> u64 {
    600
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_query_timeout_secs() -> u64 {
    30
}

fn default_frequency_vocabulary() -> Vec<String> {
    [
        "Nunca",
        "Raramente",
        "Ocasionalmente",
        "Frequentemente",
        "Muito frequentemente",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_tag_delimiter() -> String {
    crate::pipeline::DEFAULT_TAG_DELIMITER.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url_env: default_url_env(),
            secrets_file: None,
            table: default_table(),
            freshness_window_secs: default_freshness_window_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            query_timeout_secs: default_query_timeout_secs(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            frequency_vocabulary: default_frequency_vocabulary(),
            unmatched_labels: UnmatchedLabelPolicy::default(),
            tag_delimiter: default_tag_delimiter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl DatabaseConfig {
    pub fn freshness_window(&self) -> Duration {
        Duration::from_secs(self.freshness_window_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// Bound on one whole fetch: connect, query, close
    pub fn fetch_timeout(&self) -> Duration {
        self.connect_timeout() * 2 + self.query_timeout()
    }
}

impl TomlConfig {
    /// Load configuration
    ///
    /// An explicit `path` must exist. Without one, the platform default
    /// location is tried and a missing file falls back to built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    warn!(
                        "Config file not found at {}, using built-in defaults",
                        path.display()
                    );
                    Self::default()
                }
                None => {
                    warn!("Could not determine config directory, using built-in defaults");
                    Self::default()
                }
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse one TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if !is_valid_identifier(&self.database.table) {
            return Err(Error::Config(format!(
                "Invalid table name: {}",
                self.database.table
            )));
        }
        if self.database.connect_timeout_secs == 0 || self.database.query_timeout_secs == 0 {
            return Err(Error::Config(
                "database timeouts must be at least one second".to_string(),
            ));
        }
        if self.database.url_env.trim().is_empty() {
            return Err(Error::Config("database.url_env must not be empty".to_string()));
        }
        if self.dashboard.frequency_vocabulary.is_empty() {
            return Err(Error::Config(
                "dashboard.frequency_vocabulary must list at least one label".to_string(),
            ));
        }
        if self.dashboard.tag_delimiter.is_empty() {
            return Err(Error::Config("dashboard.tag_delimiter must not be empty".to_string()));
        }
        Ok(())
    }
}

/// `~/.config/survey-dash/config.toml` (platform equivalent elsewhere)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// `~/.config/survey-dash/secrets.toml` (platform equivalent elsewhere)
pub fn default_secrets_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("secrets.toml"))
}

/// Table names: non-empty, alphanumeric or underscore, under 100 chars
pub fn is_valid_identifier(name: &str) -> bool {
    name.chars().all(|c| c.is_alphanumeric() || c == '_') && !name.is_empty() && name.len() < 100
}

#[derive(Debug, Deserialize)]
struct SecretsFile {
    postgres: Option<PostgresSecrets>,
}

#[derive(Debug, Deserialize)]
struct PostgresSecrets {
    url: Option<String>,
}

/// Resolve the store URL: environment first, then the secrets file
///
/// A missing URL is a connection failure, not a configuration error: the
/// service still starts and reports the store as unavailable.
pub fn resolve_database_url(config: &DatabaseConfig) -> Result<String> {
    // Tier 1: Environment variable
    if let Ok(url) = std::env::var(&config.url_env) {
        if !url.trim().is_empty() {
            info!("Store URL loaded from environment variable {}", config.url_env);
            return Ok(url);
        }
    }

    // Tier 2: Secrets file
    let secrets_path = config.secrets_file.clone().or_else(default_secrets_path);
    if let Some(path) = secrets_path.filter(|p| p.exists()) {
        let content = std::fs::read_to_string(&path)?;
        let secrets: SecretsFile = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
        if let Some(url) = secrets
            .postgres
            .and_then(|p| p.url)
            .filter(|u| !u.trim().is_empty())
        {
            info!("Store URL loaded from secrets file {}", path.display());
            return Ok(url);
        }
        warn!("Secrets file {} has no [postgres] url", path.display());
    }

    Err(Error::Connection(format!(
        "Store URL not configured. Set {} or add [postgres] url to the secrets file",
        config.url_env
    )))
}

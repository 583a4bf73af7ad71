//! Configuration loading from disk and the process environment.
//!
//! Precedence, lowest to highest: defaults, TOML file, `.env`, environment.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "SERVICE_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to load env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidEnv {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolves a [`ServiceConfig`] from file, `.env` and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this TOML file instead of consulting `SERVICE_CONFIG`.
    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Load this env file instead of `./.env`. It must exist.
    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Resolve, override and validate the configuration.
    pub fn load(&self) -> Result<ServiceConfig, ConfigError> {
        let env_loaded = match &self.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true)?,
            // Only an absent implicit `.env` is tolerated.
            None => match dotenvy::dotenv() {
                Ok(_) => true,
                Err(dotenvy::Error::Io(e)) if e.kind() == ErrorKind::NotFound => false,
                Err(e) => return Err(e.into()),
            },
        };

        let path = self
            .config_path
            .clone()
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match &path {
            Some(path) => load_file(path)?,
            None => ServiceConfig::default(),
        };

        apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        validate_config(&config).map_err(ConfigError::Validation)?;

        tracing::debug!(
            config_file = ?path,
            env_file_loaded = env_loaded,
            "Configuration resolved"
        );

        Ok(config)
    }
}

/// Parse a TOML configuration file without validating it.
pub fn load_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Overlay environment values onto `config`.
///
/// `lookup` abstracts the environment so the mapping can be exercised
/// without touching process state.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(address) = get("BIND_ADDRESS") {
        config.listener.bind_address = address;
    }
    if let Some(port) = get("PORT") {
        config.listener.bind_address = port_to_address(&port)?;
    }

    let db = &mut config.database;
    if let Some(url) = get("DATABASE_URL") {
        db.url = Some(url);
    }
    if let Some(host) = get("DB_HOST") {
        db.host = Some(host);
    }
    if let Some(port) = get("DB_PORT") {
        db.port = parse_env("DB_PORT", &port)?;
    }
    if let Some(user) = get("DB_USER") {
        db.username = Some(user);
    }
    if let Some(password) = lookup("DB_PASSWORD") {
        db.password = Some(password);
    }
    if let Some(name) = get("DB_NAME") {
        db.database = Some(name);
    }

    if let Some(secs) = get("PROBE_TIMEOUT_SECS") {
        config.startup.probe_timeout_secs = parse_env("PROBE_TIMEOUT_SECS", &secs)?;
    }
    if let Some(attempts) = get("PROBE_MAX_ATTEMPTS") {
        config.startup.max_attempts = parse_env("PROBE_MAX_ATTEMPTS", &attempts)?;
    }

    if let Some(level) = get("LOG_LEVEL") {
        config.observability.log_level = level;
    }
    if let Some(format) = get("LOG_FORMAT") {
        config.observability.log_format = parse_env("LOG_FORMAT", &format)?;
    }

    Ok(())
}

/// `PORT` holds either a bare port (all interfaces) or a full address.
fn port_to_address(value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.contains(':') {
        return Ok(value.to_string());
    }
    let port: u16 = parse_env("PORT", value)?;
    Ok(format!("0.0.0.0:{}", port))
}

fn parse_env<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnv {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn port_expands_to_all_interfaces() {
        let mut config = ServiceConfig::default();
        apply_env_overrides(&mut config, env(&[("PORT", "3000")])).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
    }

    #[test]
    fn port_wins_over_bind_address() {
        let mut config = ServiceConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[("BIND_ADDRESS", "127.0.0.1:1"), ("PORT", "127.0.0.1:4000")]),
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:4000");
    }

    #[test]
    fn invalid_port_is_reported() {
        let mut config = ServiceConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { key: "PORT", .. }));
    }

    #[test]
    fn database_fields_are_overlaid() {
        let mut config = ServiceConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("DB_HOST", "db"),
                ("DB_PORT", "6543"),
                ("DB_USER", "app"),
                ("DB_PASSWORD", ""),
                ("DB_NAME", "books"),
                ("PROBE_TIMEOUT_SECS", "2"),
                ("LOG_FORMAT", "json"),
            ]),
        )
        .unwrap();

        assert_eq!(config.database.host.as_deref(), Some("db"));
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.username.as_deref(), Some("app"));
        // An empty password is still a password.
        assert_eq!(config.database.password.as_deref(), Some(""));
        assert_eq!(config.database.database.as_deref(), Some("books"));
        assert_eq!(config.startup.probe_timeout_secs, 2);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn explicit_env_file_must_exist() {
        let err = ConfigLoader::new()
            .with_env_file("/nonexistent/service-bootstrap.env")
            .load()
            .unwrap_err();
        assert!(
            matches!(&err, ConfigError::EnvFile(dotenvy::Error::Io(e)) if e.kind() == ErrorKind::NotFound),
            "got {err:?}"
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_file(Path::new("/nonexistent/service.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/service.toml"));
    }
}

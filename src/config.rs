//! Configuration module for Portier.

use serde::Deserialize;
use std::path::Path;

use crate::auth::MAX_SESSION_DURATION_SECS;
use crate::{PortierError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "db/users.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// File holding the server-side session secret (at least 32 bytes).
    #[serde(default = "default_key_file")]
    pub key_file: String,
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Session lifetime in seconds.
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
    /// Mark the cookie `Secure` (HTTPS only).
    #[serde(default)]
    pub secure: bool,
}

fn default_key_file() -> String {
    "session_key.txt".to_string()
}

fn default_cookie_name() -> String {
    "session".to_string()
}

fn default_max_age() -> u64 {
    7 * 24 * 60 * 60 // 7 days
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            key_file: default_key_file(),
            cookie_name: default_cookie_name(),
            max_age_secs: default_max_age(),
            secure: false,
        }
    }
}

/// Templates configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
    /// Path to the templates directory.
    #[serde(default = "default_templates_path")]
    pub path: String,
}

fn default_templates_path() -> String {
    "templates".to_string()
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            path: default_templates_path(),
        }
    }
}

/// Web configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Path to static files directory, served under `/static`.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_static_path() -> String {
    "static".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            static_path: default_static_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/portier.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Templates configuration.
    #[serde(default)]
    pub templates: TemplatesConfig,
    /// Web configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PortierError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration like [`Config::load_with_env`], using the defaults
    /// only when the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::load_with_env(path) {
            Err(PortierError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                let mut config = Self::default();
                config.apply_env_overrides();
                Ok(config)
            }
            other => other,
        }
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| PortierError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORTIER_SESSION_KEY_FILE`: Override the session key file path
    /// - `PORTIER_DATABASE_PATH`: Override the database path
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key_file) = std::env::var("PORTIER_SESSION_KEY_FILE") {
            if !key_file.is_empty() {
                self.session.key_file = key_file;
            }
        }
        if let Ok(db_path) = std::env::var("PORTIER_DATABASE_PATH") {
            if !db_path.is_empty() {
                self.database.path = db_path;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The session key file path is empty
    /// - The cookie name is empty
    /// - The session lifetime is zero or longer than [`MAX_SESSION_DURATION_SECS`]
    pub fn validate(&self) -> Result<()> {
        if self.session.key_file.trim().is_empty() {
            return Err(PortierError::Config(
                "session.key_file is not set".to_string(),
            ));
        }
        if self.session.cookie_name.trim().is_empty() {
            return Err(PortierError::Config(
                "session.cookie_name must not be empty".to_string(),
            ));
        }
        if self.session.max_age_secs == 0 {
            return Err(PortierError::Config(
                "session.max_age_secs must be greater than zero".to_string(),
            ));
        }
        if self.session.max_age_secs > MAX_SESSION_DURATION_SECS {
            return Err(PortierError::Config(format!(
                "session.max_age_secs must be at most {MAX_SESSION_DURATION_SECS}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);

        assert_eq!(config.database.path, "db/users.db");

        assert_eq!(config.session.key_file, "session_key.txt");
        assert_eq!(config.session.cookie_name, "session");
        assert_eq!(config.session.max_age_secs, 604_800);
        assert!(!config.session.secure);

        assert_eq!(config.templates.path, "templates");
        assert_eq!(config.web.static_path, "static");

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/portier.log");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 3000

[database]
path = "custom/users.sqlite"

[session]
key_file = "/etc/portier/key"
cookie_name = "sid"
max_age_secs = 3600
secure = true

[templates]
path = "custom/templates"

[web]
static_path = "public"

[logging]
level = "debug"
file = "custom/logs/app.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.path, "custom/users.sqlite");
        assert_eq!(config.session.key_file, "/etc/portier/key");
        assert_eq!(config.session.cookie_name, "sid");
        assert_eq!(config.session.max_age_secs, 3600);
        assert!(config.session.secure);
        assert_eq!(config.templates.path, "custom/templates");
        assert_eq!(config.web.static_path, "public");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/app.log");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 9090

[session]
cookie_name = "portier"
"#;

        let config = Config::parse(toml).unwrap();

        // Specified values
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.session.cookie_name, "portier");

        // Default values
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.session.max_age_secs, 604_800);
        assert_eq!(config.database.path, "db/users.db");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.key_file, "session_key.txt");
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(PortierError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");

        assert!(matches!(result, Err(PortierError::Io(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::load_or_default(dir.path().join("config.toml")).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.cookie_name, "session");
    }

    #[test]
    fn test_load_or_default_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session]\nsecure = \"yes\"\n").unwrap();

        let result = Config::load_or_default(&path);

        assert!(matches!(result, Err(PortierError::Config(_))));
    }

    #[test]
    fn test_load_or_default_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 9000\n").unwrap();

        let config = Config::load_or_default(&path).unwrap();

        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_apply_env_overrides() {
        let original_key = std::env::var("PORTIER_SESSION_KEY_FILE").ok();
        let original_db = std::env::var("PORTIER_DATABASE_PATH").ok();

        std::env::set_var("PORTIER_SESSION_KEY_FILE", "/run/secrets/session_key");
        std::env::set_var("PORTIER_DATABASE_PATH", "");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.session.key_file, "/run/secrets/session_key");
        // Empty values are ignored
        assert_eq!(config.database.path, "db/users.db");

        match original_key {
            Some(val) => std::env::set_var("PORTIER_SESSION_KEY_FILE", val),
            None => std::env::remove_var("PORTIER_SESSION_KEY_FILE"),
        }
        match original_db {
            Some(val) => std::env::set_var("PORTIER_DATABASE_PATH", val),
            None => std::env::remove_var("PORTIER_DATABASE_PATH"),
        }
    }

    #[test]
    fn test_validate_default() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_cookie_name() {
        let mut config = Config::default();
        config.session.cookie_name = " ".to_string();

        let result = config.validate();
        if let Err(PortierError::Config(msg)) = result {
            assert!(msg.contains("cookie_name"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_validate_zero_max_age() {
        let mut config = Config::default();
        config.session.max_age_secs = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_max_age_upper_bound() {
        let mut config = Config::default();
        config.session.max_age_secs = MAX_SESSION_DURATION_SECS;
        assert!(config.validate().is_ok());

        config.session.max_age_secs = 10_000_000_000_000_000;
        let result = config.validate();
        if let Err(PortierError::Config(msg)) = result {
            assert!(msg.contains("max_age_secs"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_validate_empty_key_file() {
        let mut config = Config::default();
        config.session.key_file = String::new();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let config = Config::parse(include_str!("../config.example.toml")).unwrap();
        let defaults = Config::default();

        assert_eq!(config.server.port, defaults.server.port);
        assert_eq!(config.database.path, defaults.database.path);
        assert_eq!(config.session.key_file, defaults.session.key_file);
        assert_eq!(config.session.max_age_secs, defaults.session.max_age_secs);
        assert_eq!(config.templates.path, defaults.templates.path);
        assert!(config.validate().is_ok());
    }
}

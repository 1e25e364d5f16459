//! Configuration management for dsvg.
//!
//! Parses `dsvg.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Values are layered: file, then environment, then CLI settings
//! ([`CliSettings`]).
//!
//! ## Environment Variables
//!
//! - `PORT` overrides `server.port`
//! - `DRAWIO_VERBOSE=1` enables verbose logging
//! - `DRAWIO_QUIET=1` disables logging
//!
//! ## Environment Variable Expansion
//!
//! `server.host` supports environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override verbose logging.
    pub verbose: Option<bool>,
    /// Override quiet mode.
    pub quiet: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dsvg.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Rendering configuration.
    pub render: RenderConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 3000,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log everything at `info`, including decompressed diagram XML.
    pub verbose: bool,
    /// Disable logging entirely. Wins over `verbose`.
    pub quiet: bool,
}

/// Rendering configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Emit `<switch>` text fallbacks next to HTML labels.
    pub alternate_content: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `dsvg.toml` in current directory and parents,
    /// falling back to defaults. Process environment overrides are applied
    /// next, then CLI settings.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the result is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, cli_settings, |var| std::env::var(var).ok())
    }

    /// Like [`Config::load`], resolving environment variables with `lookup`.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_with_env<F>(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path, &lookup)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered, &lookup)?
        } else {
            Self::default()
        };

        config.apply_env(&lookup)?;
        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Apply `PORT`, `DRAWIO_VERBOSE` and `DRAWIO_QUIET` overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `PORT` is not a port number.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("PORT must be a port number, got {port:?}"))
            })?;
        }
        if lookup("DRAWIO_VERBOSE").as_deref() == Some("1") {
            self.logging.verbose = true;
        }
        if lookup("DRAWIO_QUIET").as_deref() == Some("1") {
            self.logging.quiet = true;
        }
        Ok(())
    }

    /// Apply CLI settings to the configuration.
    pub fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(verbose) = settings.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(quiet) = settings.quiet {
            self.logging.quiet = quiet;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file<F>(path: &Path, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.server.host = expand::expand_with(&config.server.host, "server.host", lookup)?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert!(!config.logging.verbose);
        assert!(!config.logging.quiet);
        assert!(!config.render.alternate_content);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[logging]
verbose = true

[render]
alternate_content = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert!(config.logging.verbose);
        assert!(!config.logging.quiet);
        assert!(config.render.alternate_content);
    }

    #[test]
    fn test_apply_env() {
        let mut config = Config::default();
        config
            .apply_env(|var| match var {
                "PORT" => Some("8080".to_owned()),
                "DRAWIO_VERBOSE" => Some("1".to_owned()),
                "DRAWIO_QUIET" => Some("0".to_owned()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert!(config.logging.verbose);
        assert!(!config.logging.quiet);
    }

    #[test]
    fn test_apply_env_rejects_bad_port() {
        let mut config = Config::default();
        let err = config
            .apply_env(|var| (var == "PORT").then(|| "http".to_owned()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            host: Some("localhost".to_owned()),
            port: Some(4000),
            verbose: None,
            quiet: Some(true),
        });

        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 4000);
        assert!(!config.logging.verbose);
        assert!(config.logging.quiet);
    }

    #[test]
    fn test_load_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[server]\nhost = \"${BIND:-127.0.0.1}\"\nport = 5000\n").unwrap();

        let env = |var: &str| (var == "PORT").then(|| "6000".to_owned());
        let config = Config::load_with_env(Some(&path), None, env).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 6000);
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));

        let cli = CliSettings {
            port: Some(7000),
            ..Default::default()
        };
        let config = Config::load_with_env(Some(&path), Some(&cli), env).unwrap();
        assert_eq!(config.server.port, 7000);
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load_with_env(Some(Path::new("/nonexistent/dsvg.toml")), None, no_env)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_unset_host_variable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[server]\nhost = \"${BIND}\"\n").unwrap();

        let err = Config::load_with_env(Some(&path), None, no_env).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[server\n").unwrap();

        let err = Config::load_with_env(Some(&path), None, no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_config(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.server.port = 0;
        assert!(config.validate().unwrap_err().to_string().contains("server.port"));

        config.server.port = 3000;
        config.server.host = String::new();
        assert!(config.validate().unwrap_err().to_string().contains("server.host"));
    }
}

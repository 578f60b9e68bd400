//! Configuration management.
//!
//! Settings are layered, lowest precedence first: built-in defaults, a TOML
//! file, `ROSTER_*` environment variables, then command-line flags (applied
//! by the caller).
//!
//! ```toml
//! data_file = "students.csv"
//!
//! [logging]
//! global_level = "info"
//! store_level = "info"
//! codec_level = "warn"
//! format = "pretty"
//! file = "/var/log/roster.log"
//! ```

use crate::observability::{LogFormat, LogLevel, Logger, SharedLevel};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Conventional data file name.
pub const DEFAULT_DATA_FILE: &str = "students.csv";

/// Component name of the store logger.
pub const STORE_COMPONENT: &str = "StudentStore";

/// Environment variable overriding the data file.
pub const ENV_DATA_FILE: &str = "ROSTER_DATA_FILE";
/// Environment variable overriding the process-wide log level.
pub const ENV_LOG_LEVEL: &str = "ROSTER_LOG_LEVEL";
/// Environment variable overriding the log output format.
pub const ENV_LOG_FORMAT: &str = "ROSTER_LOG_FORMAT";
/// Environment variable overriding the log file.
pub const ENV_LOG_FILE: &str = "ROSTER_LOG_FILE";

/// Main configuration for roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterConfig {
    /// Path of the student data file.
    pub data_file: PathBuf,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Logging thresholds and output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Process-wide minimum level.
    pub global_level: LogLevel,
    /// Minimum level of the store logger.
    pub store_level: LogLevel,
    /// Minimum level of the codec logger.
    pub codec_level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Log file; stderr when `None`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            global_level: LogLevel::Info,
            store_level: LogLevel::Info,
            codec_level: LogLevel::Info,
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Creates the shared process-wide level object.
    #[must_use]
    pub fn shared_level(&self) -> SharedLevel {
        SharedLevel::new(self.global_level)
    }

    /// Creates the store logger.
    #[must_use]
    pub fn store_logger(&self, global: &SharedLevel) -> Logger {
        Logger::new(STORE_COMPONENT, self.store_level, global)
    }

    /// Creates the codec logger as a child of the store logger.
    #[must_use]
    pub fn codec_logger(&self, global: &SharedLevel) -> Logger {
        let mut logger = self.store_logger(global).child("codec");
        logger.set_level(self.codec_level);
        logger
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Data file path.
    pub data_file: Option<String>,
    /// Logging section.
    pub logging: Option<ConfigFileLogging>,
}

/// Logging section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileLogging {
    /// Process-wide level.
    pub global_level: Option<String>,
    /// Store logger level.
    pub store_level: Option<String>,
    /// Codec logger level.
    pub codec_level: Option<String>,
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Log file path.
    pub file: Option<String>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            logging: LoggingConfig::default(),
        }
    }
}

impl RosterConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or names an
    /// unknown level or format.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Self::from_config_file(file)
    }

    /// Loads configuration from the default location.
    ///
    /// Looks for `roster/config.toml` under the platform config directory and
    /// returns defaults when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be loaded.
    pub fn load_default() -> Result<Self> {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Ok(Self::default());
        };

        let path = base_dirs.config_dir().join("roster").join("config.toml");
        if path.exists() {
            return Self::load_from_file(&path);
        }
        Ok(Self::default())
    }

    /// Applies `ROSTER_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an override names an unknown level or format.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if an override names an unknown level or format.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(data_file) = lookup(ENV_DATA_FILE).filter(|v| !v.is_empty()) {
            self.data_file = PathBuf::from(data_file);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
            self.logging.global_level = level.parse()?;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT).filter(|v| !v.is_empty()) {
            self.logging.format = format.parse()?;
        }
        if let Some(file) = lookup(ENV_LOG_FILE).filter(|v| !v.is_empty()) {
            self.logging.file = Some(PathBuf::from(file));
        }
        Ok(self)
    }

    /// Converts a `ConfigFile` to `RosterConfig`.
    fn from_config_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(data_file) = file.data_file {
            config.data_file = PathBuf::from(data_file);
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.global_level {
                config.logging.global_level = level.parse()?;
            }
            if let Some(level) = logging.store_level {
                config.logging.store_level = level.parse()?;
            }
            if let Some(level) = logging.codec_level {
                config.logging.codec_level = level.parse()?;
            }
            if let Some(format) = logging.format {
                config.logging.format = format.parse()?;
            }
            config.logging.file = logging.file.map(PathBuf::from);
        }

        Ok(config)
    }
}

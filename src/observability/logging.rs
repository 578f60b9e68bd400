//! Structured logging.
//!
//! A [`Logger`] is a named sink instance with its own minimum level. Every
//! logger also holds a [`SharedLevel`], the process-wide minimum handed out
//! by whoever builds the components. An event is emitted only when it
//! clears both thresholds; emitted events go through `tracing` with the
//! logger name in the `component` field.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Severity of a log event, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
    /// Diagnostic detail.
    Debug = 0,
    /// Normal operation.
    #[default]
    Info = 1,
    /// Recoverable problem.
    Warn = 2,
    /// Failed operation.
    Error = 3,
    /// Unrecoverable; the process exits after emitting it.
    Fatal = 4,
}

impl LogLevel {
    /// Returns the upper-case label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Debug,
            1 => Self::Info,
            2 => Self::Warn,
            3 => Self::Error,
            _ => Self::Fatal,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "debug" | "trace" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            _ => Err(Error::InvalidInput(format!("Unknown log level: {s}"))),
        }
    }
}

/// Process-wide minimum log level shared by every logger built from it.
///
/// Cloning shares the same setting; changing it through any clone is seen
/// by all of them.
#[derive(Debug, Clone)]
pub struct SharedLevel(Arc<AtomicU8>);

impl Default for SharedLevel {
    fn default() -> Self {
        Self::new(LogLevel::default())
    }
}

impl SharedLevel {
    /// Creates a shared level.
    #[must_use]
    pub fn new(level: LogLevel) -> Self {
        Self(Arc::new(AtomicU8::new(level as u8)))
    }

    /// Returns the current level.
    #[must_use]
    pub fn get(&self) -> LogLevel {
        LogLevel::from_u8(self.0.load(Ordering::Relaxed))
    }

    /// Changes the level for every logger sharing this setting.
    pub fn set(&self, level: LogLevel) {
        self.0.store(level as u8, Ordering::Relaxed);
    }
}

/// Named logger with a two-tier level filter.
#[derive(Debug, Clone)]
pub struct Logger {
    name: String,
    level: LogLevel,
    global: SharedLevel,
}

impl Logger {
    /// Creates a logger named after its component.
    #[must_use]
    pub fn new(name: impl Into<String>, level: LogLevel, global: &SharedLevel) -> Self {
        Self {
            name: name.into(),
            level,
            global: global.clone(),
        }
    }

    /// Returns the component name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns this logger's own minimum level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Returns the shared process-wide level.
    #[must_use]
    pub const fn global(&self) -> &SharedLevel {
        &self.global
    }

    /// Changes this logger's own minimum level.
    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    /// Creates a logger named `<name>.<sub_name>` with the same levels.
    #[must_use]
    pub fn child(&self, sub_name: &str) -> Self {
        Self {
            name: format!("{}.{sub_name}", self.name),
            level: self.level,
            global: self.global.clone(),
        }
    }

    /// Returns whether an event at `level` clears both thresholds.
    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.global.get() && level >= self.level
    }

    /// Logs at debug level.
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message.as_ref());
    }

    /// Logs at info level.
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message.as_ref());
    }

    /// Logs at warn level.
    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warn, message.as_ref());
    }

    /// Logs at error level.
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message.as_ref());
    }

    /// Logs at fatal level and terminates the process with status 1.
    pub fn fatal(&self, message: impl AsRef<str>) -> ! {
        self.log(LogLevel::Fatal, message.as_ref());
        std::process::exit(1)
    }

    /// Logs `message` at `level` if it clears both thresholds.
    pub fn log(&self, level: LogLevel, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let component = self.name.as_str();
        match level {
            LogLevel::Debug => tracing::debug!(component, "{message}"),
            LogLevel::Info => tracing::info!(component, "{message}"),
            LogLevel::Warn => tracing::warn!(component, "{message}"),
            LogLevel::Error => tracing::error!(component, "{message}"),
            LogLevel::Fatal => tracing::error!(component, fatal = true, "{message}"),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new("default", LogLevel::Info, &SharedLevel::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(" error ".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_enabled_requires_both_thresholds() {
        let global = SharedLevel::new(LogLevel::Info);
        let logger = Logger::new("store", LogLevel::Warn, &global);

        assert!(!logger.enabled(LogLevel::Debug));
        assert!(!logger.enabled(LogLevel::Info));
        assert!(logger.enabled(LogLevel::Warn));

        global.set(LogLevel::Error);
        assert!(!logger.enabled(LogLevel::Warn));
        assert!(logger.enabled(LogLevel::Error));
    }

    #[test]
    fn test_shared_level_is_shared() {
        let global = SharedLevel::new(LogLevel::Info);
        let a = Logger::new("a", LogLevel::Debug, &global);
        let b = Logger::new("b", LogLevel::Debug, &global);

        assert!(!a.enabled(LogLevel::Debug));
        b.global().set(LogLevel::Debug);
        assert!(a.enabled(LogLevel::Debug));
    }

    #[test]
    fn test_child_inherits_levels() {
        let global = SharedLevel::new(LogLevel::Debug);
        let mut parent = Logger::new("StudentStore", LogLevel::Warn, &global);
        let child = parent.child("codec");

        assert_eq!(child.name(), "StudentStore.codec");
        assert_eq!(child.level(), LogLevel::Warn);

        parent.set_level(LogLevel::Debug);
        assert_eq!(child.level(), LogLevel::Warn);
        assert!(parent.enabled(LogLevel::Debug));
    }

    #[test]
    fn test_default_logger() {
        let logger = Logger::default();
        assert_eq!(logger.name(), "default");
        assert_eq!(logger.level(), LogLevel::Info);
        assert!(logger.enabled(LogLevel::Info));
        assert!(!logger.enabled(LogLevel::Debug));
    }
}

//! # Roster
//!
//! A student record manager.
//!
//! Roster keeps an ordered, id-unique collection of student records with
//! validated identity and contact fields plus per-subject scores, and
//! persists it as a delimited text file with a nested scores column.
//!
//! ## Features
//!
//! - Field validation grammars enforced at construction and on every setter
//! - Handle-based lookups that detect stale references instead of dangling
//! - CSV persistence with header sniffing and per-row error tolerance
//! - Two-tier leveled logging (process-wide and per-component thresholds)
//!
//! ## Example
//!
//! ```rust,ignore
//! use roster::{Student, StudentStore};
//!
//! let mut store = StudentStore::default();
//! let student = Student::new("2023010001", "王芳", "女", "101", "", "")?;
//! assert!(store.add(student));
//! assert!(store.set_score("2023010001", "数学", 92.5));
//! println!("{}", store.scores_report("2023010001"));
//! store.save_sorted("students.csv");
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod io;
pub mod models;
pub mod observability;
pub mod rendering;
pub mod storage;

// Re-exports for convenience
pub use config::{LoggingConfig, RosterConfig};
pub use models::{Field, Student, ValidationError};
pub use observability::{LogLevel, Logger, SharedLevel};
pub use storage::{StudentHandle, StudentStore};

/// Error type for roster operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Unknown log level or format names, bad CLI selections |
/// | `OperationFailed` | File I/O, CSV encoding, config parsing, logger setup |
/// | `Validation` | A student field or score breaks its grammar |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - The data file cannot be opened or created
    /// - A CSV row cannot be written or flushed
    /// - The configuration file cannot be read or parsed
    /// - The tracing subscriber cannot be installed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type alias for roster operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::OperationFailed {
            operation: "open_data_file".to_string(),
            cause: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "operation 'open_data_file' failed: permission denied"
        );
    }

    #[test]
    fn test_validation_error_converts() {
        let err: Error = Student::new("123", "王芳", "女", "101", "", "")
            .map_err(Error::from)
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ref v) if v.field == Field::Id));
        assert!(err.to_string().contains("10 digits"));
    }
}

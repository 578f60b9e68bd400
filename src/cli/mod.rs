//! CLI command implementations.
//!
//! Every command runs against a [`Session`]: the data file is loaded into a
//! [`StudentStore`], the command runs, and mutating commands write the store
//! back.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `add` | Add a student |
//! | `update` | Replace a student's fields, keeping scores |
//! | `delete` | Delete by id |
//! | `delete-by-name` | Delete by exact name, choosing among duplicates |
//! | `show` | Show one student |
//! | `find` | Find students by name |
//! | `list` | List every student |
//! | `sort` | Sort the data file by id |
//! | `score` | Record a score |
//! | `report` | Show a student's scores and average |
//! | `export` | Write a sorted copy to another file |
//! | `import` | Replace the roster with another file's contents |
//!
//! # Example Usage
//!
//! ```bash
//! roster add 2023010001 王芳 女 101 --phone 13812345678
//! roster score 2023010001 数学 92.5
//! roster report 2023010001
//! roster delete-by-name 王芳 --pick 2
//! ```

mod scores;
mod students;
mod transfer;

pub use scores::{report, score};
pub use students::{
    StudentArgs, add, delete, delete_by_name, find, list, show, sort, update,
};
pub use transfer::{export, import};

use crate::config::RosterConfig;
use crate::observability::SharedLevel;
use crate::storage::StudentStore;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// A store bound to its data file.
#[derive(Debug)]
pub struct Session {
    store: StudentStore,
    data_file: PathBuf,
}

impl Session {
    /// Opens the configured data file.
    ///
    /// A missing data file is an empty roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file exists but cannot be read.
    pub fn open(config: &RosterConfig, global: &SharedLevel) -> Result<Self> {
        let store = StudentStore::new(config.logging.store_logger(global))
            .with_codec_logger(config.logging.codec_logger(global));
        Self::with_store(store, &config.data_file)
    }

    /// Binds `store` to `data_file`, loading the file if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file exists but cannot be read.
    pub fn with_store(mut store: StudentStore, data_file: &Path) -> Result<Self> {
        if data_file.exists() {
            store.import(data_file)?;
        } else {
            store
                .logger()
                .debug(format!("{} not found, starting empty", data_file.display()));
        }
        Ok(Self {
            store,
            data_file: data_file.to_path_buf(),
        })
    }

    /// Returns the store.
    #[must_use]
    pub const fn store(&self) -> &StudentStore {
        &self.store
    }

    /// Returns the store mutably.
    pub const fn store_mut(&mut self) -> &mut StudentStore {
        &mut self.store
    }

    /// Returns the data file path.
    #[must_use]
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Writes the store back to the data file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn commit(&self) -> Result<()> {
        self.store.export(&self.data_file).map(|_| ())
    }
}

/// Turns a rejected store operation into an error.
///
/// The store has already logged the reason.
fn require(accepted: bool, operation: &str) -> Result<()> {
    if accepted {
        Ok(())
    } else {
        Err(Error::OperationFailed {
            operation: operation.to_string(),
            cause: "rejected by the store (see log)".to_string(),
        })
    }
}

//! Import and export service implementations.
//!
//! Orchestrates the format adapters and reports per-operation counts.

pub mod export;
pub mod import;

pub use export::{ExportResult, ExportService, create_data_file};
pub use import::{ImportResult, ImportService, open_data_file};

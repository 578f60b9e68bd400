//! Student export service.

use crate::io::formats::csv::CsvRecordSink;
use crate::io::traits::{RecordSink, StudentRow};
use crate::models::Student;
use crate::observability::Logger;
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Result of an export operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportResult {
    /// Number of students written.
    pub exported: usize,
}

impl ExportResult {
    /// Returns whether any students were written.
    #[must_use]
    pub const fn has_exports(&self) -> bool {
        self.exported > 0
    }
}

/// Creates (or truncates) a data file for writing.
///
/// # Errors
///
/// Returns an error if the file cannot be created.
pub fn create_data_file(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| Error::OperationFailed {
        operation: "create_data_file".to_string(),
        cause: format!("{}: {e}", path.display()),
    })?;
    Ok(BufWriter::new(file))
}

/// Service for writing students to the data file.
#[derive(Debug, Clone, Default)]
pub struct ExportService {
    logger: Logger,
}

impl ExportService {
    /// Creates a new export service.
    #[must_use]
    pub const fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Writes students to a file in iteration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn export_to_file<'a>(
        &self,
        path: &Path,
        students: impl IntoIterator<Item = &'a Student>,
    ) -> Result<ExportResult> {
        let writer = create_data_file(path)?;
        self.export_to_writer(writer, students)
    }

    /// Writes students to a writer in iteration order.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or I/O fails.
    pub fn export_to_writer<'a, W: Write>(
        &self,
        writer: W,
        students: impl IntoIterator<Item = &'a Student>,
    ) -> Result<ExportResult> {
        let mut sink = CsvRecordSink::new(writer)?;
        let result = self.export_to_sink(&mut sink, students)?;
        Box::new(sink).finalize()?;
        Ok(result)
    }

    /// Writes students to a sink without finalizing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects a row.
    pub fn export_to_sink<'a>(
        &self,
        sink: &mut dyn RecordSink,
        students: impl IntoIterator<Item = &'a Student>,
    ) -> Result<ExportResult> {
        let mut result = ExportResult::default();
        for student in students {
            sink.write(&StudentRow::from(student))?;
            result.exported += 1;
        }
        self.logger.debug(format!("encoded {} students", result.exported));
        Ok(result)
    }
}

//! Student import service.
//!
//! Turns raw records into validated students. Bad rows and bad score
//! entries are skipped one at a time and reported, never fatal.

use crate::io::formats::csv::CsvRecordSource;
use crate::io::formats::scores::decode_scores;
use crate::io::traits::{RawRecord, RecordSource, StudentRow};
use crate::models::Student;
use crate::observability::Logger;
use crate::{Error, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Result of an import operation.
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Admitted students, in file order.
    pub students: Vec<Student>,
    /// Number of students admitted.
    pub imported: usize,
    /// Rows skipped for not having exactly seven fields.
    pub skipped_malformed: usize,
    /// Rows skipped because a field failed validation.
    pub skipped_invalid: usize,
    /// Rows skipped because the id was already admitted.
    pub skipped_duplicates: usize,
    /// Individual score entries skipped.
    pub skipped_scores: usize,
    /// Data rows read, excluding header and blank lines.
    pub total_rows: usize,
    /// One message per skipped row or score entry.
    pub warnings: Vec<String>,
}

impl ImportResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether any students were admitted.
    #[must_use]
    pub const fn has_imports(&self) -> bool {
        self.imported > 0
    }

    /// Returns the number of rows skipped for any reason.
    #[must_use]
    pub const fn skipped_rows(&self) -> usize {
        self.skipped_malformed + self.skipped_invalid + self.skipped_duplicates
    }
}

/// Opens a data file for reading.
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub fn open_data_file(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| Error::OperationFailed {
        operation: "open_data_file".to_string(),
        cause: format!("{}: {e}", path.display()),
    })?;
    Ok(BufReader::new(file))
}

/// Service for reading students from the data file.
#[derive(Debug, Clone, Default)]
pub struct ImportService {
    logger: Logger,
}

impl ImportService {
    /// Creates a new import service.
    #[must_use]
    pub const fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Imports students from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn import_from_file(&self, path: &Path) -> Result<ImportResult> {
        let reader = open_data_file(path)?;
        self.import_from_reader(reader, &path.display().to_string())
    }

    /// Imports students from a reader. `origin` names the input in logs.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader fails.
    pub fn import_from_reader<R: BufRead>(
        &self,
        reader: R,
        origin: &str,
    ) -> Result<ImportResult> {
        let mut source = CsvRecordSource::new(reader);
        self.import_from_source(&mut source, origin)
    }

    /// Imports students from a source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails.
    pub fn import_from_source(
        &self,
        source: &mut dyn RecordSource,
        origin: &str,
    ) -> Result<ImportResult> {
        let mut result = ImportResult::new();
        let mut seen_ids = HashSet::new();

        while let Some(record) = source.next_record()? {
            result.total_rows += 1;
            let Some(student) = self.decode_record(record, &mut result) else {
                continue;
            };

            if !student.is_valid() {
                result.skipped_invalid += 1;
                self.skip(&mut result, format!("skipping invalid student {}", student.id()));
                continue;
            }
            if !seen_ids.insert(student.id().to_string()) {
                result.skipped_duplicates += 1;
                self.skip(&mut result, format!("skipping duplicate id {}", student.id()));
                continue;
            }

            result.imported += 1;
            result.students.push(student);
        }

        let skipped = result.skipped_rows();
        if skipped > 0 {
            self.logger.warn(format!(
                "loaded {} students from {origin}, skipped {skipped} rows",
                result.imported
            ));
        } else {
            self.logger
                .info(format!("loaded {} students from {origin}", result.imported));
        }

        Ok(result)
    }

    fn decode_record(&self, record: RawRecord, result: &mut ImportResult) -> Option<Student> {
        let RawRecord { line, fields } = record;
        let field_count = fields.len();
        let raw = fields.join(",");

        let Some(row) = StudentRow::from_fields(fields) else {
            result.skipped_malformed += 1;
            self.skip(
                result,
                format!(
                    "line {line}: expected {} fields, found {field_count}: {raw}",
                    StudentRow::FIELD_COUNT
                ),
            );
            return None;
        };

        let mut student = match Student::new(
            &row.id,
            &row.name,
            &row.gender,
            &row.class_id,
            &row.phone,
            &row.email,
        ) {
            Ok(student) => student,
            Err(e) => {
                result.skipped_invalid += 1;
                self.skip(result, format!("line {line}: skipping {} {}: {e}", row.id, row.name));
                return None;
            },
        };

        for entry in decode_scores(&row.scores) {
            let applied = match entry {
                Ok((subject, score)) => student
                    .set_score(subject, score)
                    .map_err(|e| e.to_string()),
                Err(malformed) => Err(malformed.to_string()),
            };
            if let Err(reason) = applied {
                result.skipped_scores += 1;
                self.skip(result, format!("line {line}: student {}: {reason}", row.id));
            }
        }

        Some(student)
    }

    fn skip(&self, result: &mut ImportResult, message: String) {
        self.logger.warn(&message);
        result.warnings.push(message);
    }
}

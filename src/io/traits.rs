//! Core traits for reading and writing student rows.
//!
//! Defines the [`RecordSource`] and [`RecordSink`] traits that format
//! adapters implement, plus the row types passed across them.

use crate::Result;
use crate::io::formats::scores::encode_scores;
use crate::models::Student;

/// One record as read from a source, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line number in the source, `0` when unknown.
    pub line: u64,
    /// Field values in column order.
    pub fields: Vec<String>,
}

impl RawRecord {
    /// Creates a raw record.
    #[must_use]
    pub const fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }
}

/// A row of the full student format.
///
/// # Column Order
///
/// | # | Field | Empty allowed |
/// |---|-------|---------------|
/// | 1 | `id` | No |
/// | 2 | `name` | No |
/// | 3 | `gender` | No |
/// | 4 | `class_id` | No |
/// | 5 | `phone` | Yes |
/// | 6 | `email` | Yes |
/// | 7 | `scores` | Yes (or the no-scores marker) |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRow {
    /// Student id.
    pub id: String,
    /// Name.
    pub name: String,
    /// Gender label.
    pub gender: String,
    /// Class id.
    pub class_id: String,
    /// Phone number.
    pub phone: String,
    /// Email address.
    pub email: String,
    /// Encoded scores-blob.
    pub scores: String,
}

impl StudentRow {
    /// Number of columns in the full format.
    pub const FIELD_COUNT: usize = 7;

    /// Builds a row from exactly [`Self::FIELD_COUNT`] fields.
    ///
    /// Returns `None` for any other field count.
    #[must_use]
    pub fn from_fields(fields: Vec<String>) -> Option<Self> {
        let [id, name, gender, class_id, phone, email, scores]: [String; Self::FIELD_COUNT] =
            fields.try_into().ok()?;
        Some(Self {
            id,
            name,
            gender,
            class_id,
            phone,
            email,
            scores,
        })
    }

    /// Returns the fields in column order.
    #[must_use]
    pub fn as_fields(&self) -> [&str; Self::FIELD_COUNT] {
        [
            &self.id,
            &self.name,
            &self.gender,
            &self.class_id,
            &self.phone,
            &self.email,
            &self.scores,
        ]
    }
}

impl From<&Student> for StudentRow {
    fn from(s: &Student) -> Self {
        Self {
            id: s.id().to_string(),
            name: s.name().to_string(),
            gender: s.gender().to_string(),
            class_id: s.class_id().to_string(),
            phone: s.phone().to_string(),
            email: s.email().to_string(),
            scores: encode_scores(s.scores()),
        }
    }
}

/// Source of raw records.
///
/// Implementations skip header and blank lines themselves and yield data
/// records one at a time.
pub trait RecordSource {
    /// Reads the next data record.
    ///
    /// Returns `Ok(None)` when the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reader fails.
    fn next_record(&mut self) -> Result<Option<RawRecord>>;
}

/// Sink for student rows.
///
/// # Lifecycle
///
/// 1. Create the sink (the header is written on creation)
/// 2. Call `write()` for each row
/// 3. Call `finalize()` to flush
pub trait RecordSink {
    /// Writes a single row.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or I/O fails.
    fn write(&mut self, row: &StudentRow) -> Result<()>;

    /// Flushes buffered output. Consumes the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if I/O fails.
    fn finalize(self: Box<Self>) -> Result<()>;
}

//! CSV format adapter for the student data file.
//!
//! Rows are written with a fixed header and quoted only when a field needs
//! it, so ordinary rows are plain comma-joined text.

use crate::io::traits::{RawRecord, RecordSink, RecordSource, StudentRow};
use crate::{Error, Result};
use std::io::{BufRead, Write};

/// Header row of the student data file.
pub const HEADER: [&str; StudentRow::FIELD_COUNT] =
    ["学号", "姓名", "性别", "班级", "电话", "邮箱", "成绩信息"];

/// A first row containing this text in any field is treated as the header.
pub const HEADER_MARKER: &str = "学号";

const BOM: char = '\u{feff}';

/// CSV record source.
///
/// Reads one physical line at a time and splits each line on its own, so a
/// stray quote can only spoil the line it appears on. Skips a leading header
/// row and blank lines. Invalid UTF-8 is replaced rather than rejected so
/// one bad row cannot abort a load.
pub struct CsvRecordSource<R: BufRead> {
    input: R,
    buffer: Vec<u8>,
    record: csv::ByteRecord,
    line: u64,
    first: bool,
}

impl<R: BufRead> CsvRecordSource<R> {
    /// Creates a new CSV record source.
    #[must_use]
    pub fn new(input: R) -> Self {
        Self {
            input,
            buffer: Vec::new(),
            record: csv::ByteRecord::new(),
            line: 0,
            first: true,
        }
    }

    /// Reads the next physical line into `buffer` without its terminator.
    fn read_line(&mut self) -> Result<bool> {
        self.buffer.clear();
        let read = self
            .input
            .read_until(b'\n', &mut self.buffer)
            .map_err(|e| Error::OperationFailed {
                operation: "read_csv".to_string(),
                cause: e.to_string(),
            })?;
        if read == 0 {
            return Ok(false);
        }

        self.line += 1;
        while matches!(self.buffer.last(), Some(b'\n' | b'\r')) {
            self.buffer.pop();
        }
        Ok(true)
    }

    /// Splits the current line into fields.
    fn split_line(&mut self) -> Vec<String> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(self.buffer.as_slice());

        match reader.read_byte_record(&mut self.record) {
            Ok(true) => self
                .record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect(),
            // Unsplittable: keep the raw text as one field so it is reported.
            _ => vec![String::from_utf8_lossy(&self.buffer).into_owned()],
        }
    }
}

impl<R: BufRead> RecordSource for CsvRecordSource<R> {
    fn next_record(&mut self) -> Result<Option<RawRecord>> {
        while self.read_line()? {
            if self.buffer.is_empty() {
                continue;
            }

            let mut fields = self.split_line();

            if std::mem::take(&mut self.first) {
                if let Some(field) = fields.first_mut().filter(|f| f.starts_with(BOM)) {
                    field.remove(0);
                }
                if fields.iter().any(|f| f.contains(HEADER_MARKER)) {
                    continue;
                }
            }

            return Ok(Some(RawRecord::new(self.line, fields)));
        }
        Ok(None)
    }
}

/// CSV record sink.
///
/// The header row is written on creation, so even an empty roster produces
/// a well-formed file.
pub struct CsvRecordSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvRecordSink<W> {
    /// Creates a new CSV record sink and writes the header row.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be written.
    pub fn new(writer: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        writer
            .write_record(HEADER)
            .map_err(|e| Error::OperationFailed {
                operation: "write_csv_headers".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self { writer })
    }
}

impl<W: Write> RecordSink for CsvRecordSink<W> {
    fn write(&mut self, row: &StudentRow) -> Result<()> {
        self.writer
            .write_record(row.as_fields())
            .map_err(|e| Error::OperationFailed {
                operation: "write_csv".to_string(),
                cause: e.to_string(),
            })
    }

    fn finalize(mut self: Box<Self>) -> Result<()> {
        self.writer.flush().map_err(|e| Error::OperationFailed {
            operation: "flush_csv".to_string(),
            cause: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(input: &str) -> Vec<RawRecord> {
        let mut source = CsvRecordSource::new(Cursor::new(input.to_string()));
        let mut records = Vec::new();
        while let Some(record) = source.next_record().unwrap() {
            records.push(record);
        }
        records
    }

    fn row(id: &str, name: &str, scores: &str) -> StudentRow {
        StudentRow {
            id: id.to_string(),
            name: name.to_string(),
            gender: "女".to_string(),
            class_id: "101".to_string(),
            phone: String::new(),
            email: String::new(),
            scores: scores.to_string(),
        }
    }

    #[test]
    fn test_source_skips_header_and_blank_lines() {
        let input = "学号,姓名,性别,班级,电话,邮箱,成绩信息\n\
                     2023010001,王芳,女,101,,,无成绩\n\
                     \n\
                     2023010002,李雷,男,102,,,数学:80\n";
        let records = read_all(input);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields[0], "2023010001");
        assert_eq!(records[0].line, 2);
        assert_eq!(records[1].fields[6], "数学:80");
        assert_eq!(records[1].line, 4);
    }

    #[test]
    fn test_source_without_header_keeps_first_row() {
        let records = read_all("2023010001,王芳,女,101,,,无成绩\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields.len(), 7);
    }

    #[test]
    fn test_source_header_after_bom() {
        let records = read_all("\u{feff}学号,姓名\n2023010001,王芳,女,101,,,无成绩\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields[0], "2023010001");
    }

    #[test]
    fn test_source_reports_short_rows_as_is() {
        let records = read_all("2023010001,王芳,女,101\n");
        assert_eq!(records[0].fields.len(), 4);
    }

    #[test]
    fn test_source_stray_quote_stays_on_its_line() {
        let records = read_all(
            "2023010001,王芳,女,101,,,无成绩\n\
             2023010002,\"李雷,男,102,,,无成绩\n\
             2023010003,韩梅梅,女,101,,,无成绩\r\n",
        );

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].line, 2);
        assert_eq!(records[1].fields.len(), 2);
        assert_eq!(records[2].fields.len(), 7);
        assert_eq!(records[2].fields[6], "无成绩");
        assert_eq!(records[2].line, 3);
    }

    #[test]
    fn test_sink_writes_header_and_plain_rows() {
        let mut output = Vec::new();
        {
            let mut sink = CsvRecordSink::new(&mut output).unwrap();
            sink.write(&row("2023010001", "王芳", "数学:92.5")).unwrap();
            Box::new(sink).finalize().unwrap();
        }

        let text = String::from_utf8(output).unwrap();
        assert_eq!(
            text,
            "学号,姓名,性别,班级,电话,邮箱,成绩信息\n2023010001,王芳,女,101,,,数学:92.5\n"
        );
    }

    #[test]
    fn test_sink_header_only_when_empty() {
        let mut output = Vec::new();
        Box::new(CsvRecordSink::new(&mut output).unwrap())
            .finalize()
            .unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "学号,姓名,性别,班级,电话,邮箱,成绩信息\n"
        );
    }

    #[test]
    fn test_sink_quotes_fields_with_commas() {
        let mut output = Vec::new();
        {
            let mut sink = CsvRecordSink::new(&mut output).unwrap();
            sink.write(&row("2023010001", "Smith, Jo", "无成绩")).unwrap();
            Box::new(sink).finalize().unwrap();
        }

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("\"Smith, Jo\""));

        let records = read_all(&text);
        assert_eq!(records[0].fields[1], "Smith, Jo");
    }
}

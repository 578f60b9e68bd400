//! Persistence of the student roster.
//!
//! # Architecture
//!
//! - **Format adapters** implement [`RecordSource`] and [`RecordSink`]
//! - **Services** validate incoming rows and encode outgoing students
//!
//! # File Format
//!
//! ```text
//! 学号,姓名,性别,班级,电话,邮箱,成绩信息
//! 2023010001,王芳,女,101,13812345678,,数学:92.5;英语:78
//! 2023010002,李雷,男,102,,,无成绩
//! ```
//!
//! The header is always written and is recognised on read by the `学号`
//! marker. Each line is one row and is split on its own. Rows with the
//! wrong field count, invalid fields or a repeated id are skipped; a bad
//! scores entry drops only that entry.
//!
//! # Examples
//!
//! ```rust,ignore
//! use roster::io::{ExportService, ImportService};
//!
//! let result = ImportService::new(logger).import_from_file(path)?;
//! println!("Imported {} students", result.imported);
//! ```

pub mod formats;
pub mod services;
pub mod traits;

pub use formats::csv::{CsvRecordSink, CsvRecordSource, HEADER};
pub use formats::scores::{NO_SCORES, decode_scores, encode_scores};
pub use services::{ExportResult, ExportService, ImportResult, ImportService};
pub use traits::{RawRecord, RecordSink, RecordSource, StudentRow};

//! Format adapters for the student data file.
//!
//! [`csv`] implements [`RecordSource`](super::traits::RecordSource) and
//! [`RecordSink`](super::traits::RecordSink); [`scores`] encodes the packed
//! scores column.

pub mod csv;
pub mod scores;

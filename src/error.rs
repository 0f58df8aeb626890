//! Error types for decoding, batch processing and export.
//!
//! Line-level errors (`LineError`) are recovered by the batch processor and
//! turned into diagnostics. File-level errors (`ProcessError`) abort a run.

use std::io;
use std::path::PathBuf;
use std::str::Utf8Error;

use thiserror::Error;

use crate::record::RecordTypeCode;

/// A string that cannot be used as a record type code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record type code must be exactly 2 characters, got {code:?}")]
pub struct CodeError {
    pub code: String,
}

/// Failure to extract one field from a fixed-width line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("field '{field}' needs {len} columns from column {start} but line has {line_len} characters")]
    Truncated {
        field: String,
        start: usize,
        len: usize,
        line_len: usize,
    },

    #[error("field '{field}' is not numeric: {value:?}")]
    NotNumeric { field: String, value: String },

    #[error("field '{field}' is invalid: {reason}")]
    Invalid { field: String, reason: String },
}

/// A decoder rejected a line whose type code it was registered for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode record type {code}: {cause}")]
pub struct DecodeError {
    pub code: RecordTypeCode,
    pub line: String,
    #[source]
    pub cause: FieldError,
}

/// Recoverable failure for a single input line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("line too short for a record type code ({length} characters)")]
    Malformed { length: usize },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Fatal failure of a batch run.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("cannot open '{}': {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read failed: {source}")]
    Read {
        #[source]
        source: io::Error,
    },

    #[error("line {line_number} is not valid UTF-8: {source}")]
    Encoding {
        line_number: usize,
        #[source]
        source: Utf8Error,
    },

    #[error("{diagnostics} line(s) could not be decoded")]
    Rejected { diagnostics: usize },
}

/// Failure while writing a table as delimited text.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

//! Line-by-line batch decoding of a DAMEF file.
//!
//! The processor streams the input in file order, hands each line to the
//! registry and accumulates decoded rows. Line-level problems become
//! diagnostics and processing continues; only open, read and UTF-8
//! failures abort the run.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::damef;
use crate::error::{FieldError, LineError, ProcessError};
use crate::record::RecordTypeCode;
use crate::registry::{DecoderRegistry, Resolution};
use crate::table::RecordTable;

/// Why a line was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// No decoder registered for the code.
    Unrecognized { code: RecordTypeCode },
    /// Line shorter than a record type code.
    Malformed { length: usize },
    /// The decoder for `code` rejected the line.
    Decode {
        code: RecordTypeCode,
        cause: FieldError,
    },
}

/// One skipped line, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line_number: usize,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Code of the skipped line, if it had one.
    pub fn code(&self) -> Option<RecordTypeCode> {
        match &self.kind {
            DiagnosticKind::Unrecognized { code } | DiagnosticKind::Decode { code, .. } => {
                Some(*code)
            }
            DiagnosticKind::Malformed { .. } => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::Unrecognized { code } => {
                write!(f, "line {}: unrecognized record type '{code}'", self.line_number)
            }
            DiagnosticKind::Malformed { length } => write!(
                f,
                "line {}: malformed line ({length} characters, expected a 2-character record type)",
                self.line_number
            ),
            DiagnosticKind::Decode { code, cause } => write!(
                f,
                "line {}: record type '{code}' could not be decoded: {cause}",
                self.line_number
            ),
        }
    }
}

/// Result of a completed run: the table plus every skipped line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessOutcome {
    pub table: RecordTable,
    pub diagnostics: Vec<Diagnostic>,
}

impl ProcessOutcome {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Strict policy: any diagnostic fails the whole run.
    pub fn into_strict(self) -> Result<RecordTable, ProcessError> {
        if self.diagnostics.is_empty() {
            Ok(self.table)
        } else {
            Err(ProcessError::Rejected {
                diagnostics: self.diagnostics.len(),
            })
        }
    }
}

/// Drives a `DecoderRegistry` over whole files.
#[derive(Debug, Clone, Copy)]
pub struct BatchProcessor<'a> {
    registry: &'a DecoderRegistry,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(registry: &'a DecoderRegistry) -> Self {
        Self { registry }
    }

    /// Decode the file at `path`.
    pub fn process(&self, path: impl AsRef<Path>) -> Result<ProcessOutcome, ProcessError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ProcessError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "processing DAMEF file");
        self.process_reader(BufReader::new(file))
    }

    /// Decode newline-delimited UTF-8 text from `reader`.
    pub fn process_reader<R: BufRead>(&self, mut reader: R) -> Result<ProcessOutcome, ProcessError> {
        let mut outcome = ProcessOutcome::default();
        let mut buf = Vec::new();
        let mut line_number = 0;

        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| ProcessError::Read { source })?;
            if n == 0 {
                break;
            }
            line_number += 1;

            if buf.last() == Some(&b'\n') {
                buf.pop();
            }
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
            let line = std::str::from_utf8(&buf)
                .map_err(|source| ProcessError::Encoding { line_number, source })?;

            self.process_line(line_number, line, &mut outcome);
        }

        info!(
            lines = line_number,
            rows = outcome.table.len(),
            diagnostics = outcome.diagnostics.len(),
            "DAMEF processing finished"
        );
        Ok(outcome)
    }

    fn process_line(&self, line_number: usize, line: &str, outcome: &mut ProcessOutcome) {
        let kind = match self.registry.resolve_and_decode(line) {
            Ok(Resolution::Decoded(record)) => {
                outcome.table.push(record);
                return;
            }
            Ok(Resolution::Unrecognized(code)) => DiagnosticKind::Unrecognized { code },
            Err(LineError::Malformed { length }) => DiagnosticKind::Malformed { length },
            Err(LineError::Decode(err)) => DiagnosticKind::Decode {
                code: err.code,
                cause: err.cause,
            },
        };

        let diagnostic = Diagnostic { line_number, kind };
        let code = diagnostic.code().map(|c| c.to_string()).unwrap_or_default();
        warn!(line = line_number, code = %code, "{diagnostic}");
        outcome.diagnostics.push(diagnostic);
    }
}

/// Decode `path` with the default DAMEF mapping.
pub fn process_file(path: impl AsRef<Path>) -> Result<ProcessOutcome, ProcessError> {
    let registry = damef::default_registry();
    BatchProcessor::new(&registry).process(path)
}

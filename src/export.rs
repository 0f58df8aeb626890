//! Delimited-text export of a `RecordTable`.
//!
//! The header row lists the table columns in order; each row follows in
//! table order with absent fields written as empty cells.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::ExportError;
use crate::table::RecordTable;

/// File name used when the user accepts an export without naming a file.
pub const DEFAULT_EXPORT_FILE: &str = "dados_damef_filtrados.csv";

/// Write `table` to `writer` using `delimiter` between cells.
pub fn write_csv<W: Write>(table: &RecordTable, writer: W, delimiter: u8) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    if table.columns().is_empty() {
        return Ok(());
    }

    wtr.write_record(table.columns())?;
    for row in table {
        wtr.write_record(table.columns().iter().map(|column| {
            row.get(column)
                .map(|value| value.to_string())
                .unwrap_or_default()
        }))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write `table` to the file at `path`, creating parent directories.
pub fn export_csv(table: &RecordTable, path: impl AsRef<Path>, delimiter: u8) -> Result<(), ExportError> {
    let path = path.as_ref();
    let io_error = |source: std::io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let file = File::create(path).map_err(io_error)?;
    write_csv(table, file, delimiter)
}

//! Ordered table of decoded records.
//!
//! Rows keep file order. The column set is the union of every field seen so
//! far, in order of first appearance; a row without a given column simply
//! has no cell there.

use crate::record::{DecodedRecord, FieldValue, RecordTypeCode};

/// Widest cell shown by `preview` before truncation.
const PREVIEW_CELL_WIDTH: usize = 30;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<DecodedRecord>,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row, extending the column set with any new field names.
    pub fn push(&mut self, record: DecodedRecord) {
        for name in record.fields().names() {
            if !self.columns.iter().any(|c| c == name) {
                self.columns.push(name.to_string());
            }
        }
        self.rows.push(record);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[DecodedRecord] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DecodedRecord> {
        self.rows.iter()
    }

    /// Value at `(row, column)`; `None` for out-of-range rows and absent fields.
    pub fn cell(&self, row: usize, column: &str) -> Option<&FieldValue> {
        self.rows.get(row)?.get(column)
    }

    /// Distinct record type codes in order of first appearance.
    pub fn record_types(&self) -> Vec<RecordTypeCode> {
        let mut seen = Vec::new();
        for record in &self.rows {
            if !seen.contains(&record.code()) {
                seen.push(record.code());
            }
        }
        seen
    }

    /// Rows matching `predicate`, in order. The column set is kept as is so
    /// a filtered export has the same header as the full table.
    pub fn filter<F>(&self, predicate: F) -> RecordTable
    where
        F: Fn(&DecodedRecord) -> bool,
    {
        RecordTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| predicate(r)).cloned().collect(),
        }
    }

    /// Column-aligned text rendering of the first `max_rows` rows.
    pub fn preview(&self, max_rows: usize) -> String {
        let shown = &self.rows[..self.rows.len().min(max_rows)];
        let cells: Vec<Vec<String>> = shown
            .iter()
            .map(|record| {
                self.columns
                    .iter()
                    .map(|c| record.get(c).map_or_else(|| "-".to_string(), clip))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = Vec::new();
        out.push(join_padded(self.columns.iter().map(String::as_str), &widths));
        out.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("  "),
        );
        for row in &cells {
            out.push(join_padded(row.iter().map(String::as_str), &widths));
        }
        if self.rows.len() > shown.len() {
            out.push(format!("... {} more rows", self.rows.len() - shown.len()));
        }
        out.push(format!(
            "[{} rows x {} columns]",
            self.rows.len(),
            self.columns.len()
        ));
        out.join("\n")
    }
}

fn clip(value: &FieldValue) -> String {
    let text = value.to_string();
    if text.chars().count() <= PREVIEW_CELL_WIDTH {
        text
    } else {
        let mut cut: String = text.chars().take(PREVIEW_CELL_WIDTH - 3).collect();
        cut.push_str("...");
        cut
    }
}

fn join_padded<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, w)| format!("{cell:<w$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

impl FromIterator<DecodedRecord> for RecordTable {
    fn from_iter<I: IntoIterator<Item = DecodedRecord>>(iter: I) -> Self {
        let mut table = RecordTable::new();
        for record in iter {
            table.push(record);
        }
        table
    }
}

impl<'a> IntoIterator for &'a RecordTable {
    type Item = &'a DecodedRecord;
    type IntoIter = std::slice::Iter<'a, DecodedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

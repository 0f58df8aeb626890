//! Record type selection.
//!
//! Selections are written as a comma-separated list of codes, e.g.
//! `"01, 03,99"`. An empty selection keeps every record type.

use std::collections::BTreeSet;

use crate::error::CodeError;
use crate::record::{DecodedRecord, RecordTypeCode};
use crate::table::RecordTable;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(BTreeSet<RecordTypeCode>),
}

impl TypeFilter {
    /// Parse a comma-separated selection. Blank entries are ignored.
    pub fn parse(selection: &str) -> Result<Self, CodeError> {
        let codes = selection
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<RecordTypeCode>)
            .collect::<Result<BTreeSet<RecordTypeCode>, _>>()?;

        if codes.is_empty() {
            Ok(TypeFilter::All)
        } else {
            Ok(TypeFilter::Only(codes))
        }
    }

    pub fn matches(&self, record: &DecodedRecord) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(codes) => codes.contains(&record.code()),
        }
    }

    /// Rows whose type is selected, in table order.
    pub fn apply(&self, table: &RecordTable) -> RecordTable {
        match self {
            TypeFilter::All => table.clone(),
            TypeFilter::Only(_) => table.filter(|r| self.matches(r)),
        }
    }
}

impl FromIterator<RecordTypeCode> for TypeFilter {
    fn from_iter<I: IntoIterator<Item = RecordTypeCode>>(iter: I) -> Self {
        TypeFilter::Only(iter.into_iter().collect())
    }
}

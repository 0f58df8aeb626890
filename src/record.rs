//! Record type codes, field values and decoded records.
//!
//! Every DAMEF line starts with a two-character record type code that
//! selects the layout of the remaining columns. A decoded line is a
//! `FieldMap` tagged with that code.

use std::fmt;
use std::str::FromStr;

use crate::error::CodeError;

/// Name of the column that carries the record type code of every row.
pub const TYPE_FIELD: &str = "Tipo de Registro";

/// Two-character record type code, e.g. `01`, `0A` or `99`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordTypeCode([char; 2]);

impl RecordTypeCode {
    /// Build a code from two ASCII bytes.
    pub const fn from_ascii(code: [u8; 2]) -> Self {
        Self([code[0] as char, code[1] as char])
    }

    /// Take the code from the first two characters of a raw line.
    ///
    /// Returns `None` when the line is shorter than two characters.
    pub fn from_line(line: &str) -> Option<Self> {
        let mut chars = line.chars();
        let first = chars.next()?;
        let second = chars.next()?;
        Some(Self([first, second]))
    }

    pub fn chars(&self) -> [char; 2] {
        self.0
    }
}

impl fmt::Display for RecordTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0[0], self.0[1])
    }
}

impl FromStr for RecordTypeCode {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_line(s) {
            Some(code) if s.chars().count() == 2 => Ok(code),
            _ => Err(CodeError {
                code: s.to_string(),
            }),
        }
    }
}

/// Value of one decoded field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Decimal(x) => write!(f, "{x}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        FieldValue::Decimal(x)
    }
}

/// Field name to value mapping that keeps insertion order.
///
/// Decoders emit fields in layout order, and that order becomes the
/// column order of the output table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field. An existing field with the same name is replaced in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// One successfully decoded line, tagged with its record type code.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    code: RecordTypeCode,
    fields: FieldMap,
}

impl DecodedRecord {
    /// Tag decoder output with the code that selected the decoder.
    ///
    /// The `Tipo de Registro` field always reflects `code`, even if the
    /// decoder produced a field of the same name.
    pub fn new(code: RecordTypeCode, mut fields: FieldMap) -> Self {
        fields.insert(TYPE_FIELD, code.to_string());
        Self { code, fields }
    }

    pub fn code(&self) -> RecordTypeCode {
        self.code
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

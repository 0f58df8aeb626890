//! Record decoders and declarative fixed-width layouts.
//!
//! A decoder turns one raw line into a `FieldMap`. It receives the whole
//! line, type code included, and trusts the caller to have matched the code
//! to the right layout. Decoders are pure: no access to file position or
//! other records.
//!
//! Column positions in a `FieldSpec` are 0-based character offsets into the
//! full line, so the type code occupies columns 0 and 1.

use crate::error::FieldError;
use crate::record::{FieldMap, FieldValue};

/// Converts a raw line of one layout into named fields.
pub trait RecordDecoder: Send + Sync {
    /// Decode the full raw line, including the leading type code.
    fn decode(&self, line: &str) -> Result<FieldMap, FieldError>;

    /// The display name of this decoder.
    fn name(&self) -> &str;
}

/// Decoder backed by a plain function.
pub struct FnDecoder {
    name: &'static str,
    decode: fn(&str) -> Result<FieldMap, FieldError>,
}

impl FnDecoder {
    pub const fn new(name: &'static str, decode: fn(&str) -> Result<FieldMap, FieldError>) -> Self {
        Self { name, decode }
    }
}

impl RecordDecoder for FnDecoder {
    fn decode(&self, line: &str) -> Result<FieldMap, FieldError> {
        (self.decode)(line)
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Slice `len` characters starting at character `start`.
///
/// Returns `None` if the line ends before `start + len`.
pub fn columns(line: &str, start: usize, len: usize) -> Option<&str> {
    let mut offsets = line
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()));
    let begin = offsets.nth(start)?;
    let end = if len == 0 {
        begin
    } else {
        offsets.nth(len - 1)?
    };
    Some(&line[begin..end])
}

/// How the characters of a column are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Text with surrounding blanks removed.
    Text,
    /// Signed whole number.
    Integer,
    /// Number with `scale` implied decimal places, unless the column
    /// carries an explicit `.` or `,` separator.
    Decimal { scale: u32 },
}

/// One column of a fixed-width layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub start: usize,
    pub len: usize,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, start: usize, len: usize, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            start,
            len,
            kind,
        }
    }

    pub fn text(name: impl Into<String>, start: usize, len: usize) -> Self {
        Self::new(name, start, len, FieldKind::Text)
    }

    pub fn integer(name: impl Into<String>, start: usize, len: usize) -> Self {
        Self::new(name, start, len, FieldKind::Integer)
    }

    pub fn decimal(name: impl Into<String>, start: usize, len: usize, scale: u32) -> Self {
        Self::new(name, start, len, FieldKind::Decimal { scale })
    }

    /// Extract and convert this column from a raw line.
    pub fn extract(&self, line: &str) -> Result<FieldValue, FieldError> {
        let raw = columns(line, self.start, self.len).ok_or_else(|| FieldError::Truncated {
            field: self.name.clone(),
            start: self.start,
            len: self.len,
            line_len: line.chars().count(),
        })?;
        let trimmed = raw.trim();

        match self.kind {
            FieldKind::Text => Ok(FieldValue::Text(trimmed.to_string())),
            FieldKind::Integer => trimmed
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| self.not_numeric(raw)),
            FieldKind::Decimal { scale } => {
                if trimmed.contains(['.', ',']) {
                    trimmed
                        .replace(',', ".")
                        .parse::<f64>()
                        .map(FieldValue::Decimal)
                        .map_err(|_| self.not_numeric(raw))
                } else {
                    let units = trimmed
                        .parse::<i64>()
                        .map_err(|_| self.not_numeric(raw))?;
                    Ok(FieldValue::Decimal(units as f64 / 10f64.powi(scale as i32)))
                }
            }
        }
    }

    fn not_numeric(&self, raw: &str) -> FieldError {
        FieldError::NotNumeric {
            field: self.name.clone(),
            value: raw.to_string(),
        }
    }
}

/// Decoder driven by a list of column definitions.
#[derive(Debug, Clone)]
pub struct LayoutDecoder {
    name: String,
    fields: Vec<FieldSpec>,
}

impl LayoutDecoder {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}

impl RecordDecoder for LayoutDecoder {
    fn decode(&self, line: &str) -> Result<FieldMap, FieldError> {
        let mut out = FieldMap::new();
        for spec in &self.fields {
            out.insert(spec.name.clone(), spec.extract(line)?);
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Decoder for layouts without a column breakdown: keeps everything after
/// the type code as a single text field.
#[derive(Debug, Clone)]
pub struct PayloadDecoder {
    name: String,
    field: String,
}

impl PayloadDecoder {
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
        }
    }
}

impl RecordDecoder for PayloadDecoder {
    fn decode(&self, line: &str) -> Result<FieldMap, FieldError> {
        let payload = line.char_indices().nth(2).map_or("", |(i, _)| &line[i..]);
        let mut out = FieldMap::new();
        out.insert(self.field.clone(), payload.trim_end());
        Ok(out)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_ascii() {
        assert_eq!(columns("01FIELDA001", 2, 6), Some("FIELDA"));
        assert_eq!(columns("01FIELDA001", 8, 3), Some("001"));
        assert_eq!(columns("01FIELDA001", 11, 0), Some(""));
    }

    #[test]
    fn test_columns_past_end() {
        assert_eq!(columns("01FIELDA001", 8, 4), None);
        assert_eq!(columns("01", 5, 1), None);
    }

    #[test]
    fn test_columns_counts_characters() {
        assert_eq!(columns("0AAÇÚCAR  X", 2, 6), Some("AÇÚCAR"));
        assert_eq!(columns("0AAÇÚCAR  X", 10, 1), Some("X"));
    }

    #[test]
    fn test_text_field_trimmed() {
        let spec = FieldSpec::text("Nome", 2, 8);
        assert_eq!(
            spec.extract("01  ACME  ").unwrap(),
            FieldValue::Text("ACME".to_string())
        );
    }

    #[test]
    fn test_integer_field() {
        let spec = FieldSpec::integer("Total", 2, 6);
        assert_eq!(spec.extract("99000042").unwrap(), FieldValue::Integer(42));
    }

    #[test]
    fn test_integer_field_rejects_letters() {
        let spec = FieldSpec::integer("Total", 2, 6);
        let err = spec.extract("9900A042").unwrap_err();
        assert!(matches!(err, FieldError::NotNumeric { ref field, .. } if field == "Total"));
    }

    #[test]
    fn test_integer_field_rejects_blank() {
        let spec = FieldSpec::integer("Total", 2, 6);
        assert!(spec.extract("99      ").is_err());
    }

    #[test]
    fn test_decimal_implied_scale() {
        let spec = FieldSpec::decimal("Valor", 2, 8, 2);
        assert_eq!(spec.extract("0100012345").unwrap(), FieldValue::Decimal(123.45));
    }

    #[test]
    fn test_decimal_explicit_comma() {
        let spec = FieldSpec::decimal("Valor", 2, 8, 2);
        assert_eq!(spec.extract("01  123,45").unwrap(), FieldValue::Decimal(123.45));
    }

    #[test]
    fn test_truncated_field() {
        let spec = FieldSpec::text("CNPJ", 2, 14);
        let err = spec.extract("0A123").unwrap_err();
        assert_eq!(
            err,
            FieldError::Truncated {
                field: "CNPJ".to_string(),
                start: 2,
                len: 14,
                line_len: 5,
            }
        );
    }

    #[test]
    fn test_layout_decoder_in_order() {
        let decoder = LayoutDecoder::new(
            "pair",
            vec![
                FieldSpec::text("A", 2, 6),
                FieldSpec::integer("B", 8, 3),
            ],
        );
        let fields = decoder.decode("01FIELDA001").unwrap();
        let names: Vec<&str> = fields.names().collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(fields.get("B"), Some(&FieldValue::Integer(1)));
        assert_eq!(decoder.name(), "pair");
    }

    #[test]
    fn test_layout_decoder_fails_on_first_bad_field() {
        let decoder = LayoutDecoder::new("pair", vec![FieldSpec::text("A", 2, 6)]);
        assert!(decoder.decode("01").is_err());
    }

    #[test]
    fn test_payload_decoder() {
        let decoder = PayloadDecoder::new("raw", "Conteúdo");
        let fields = decoder.decode("06 some payload   ").unwrap();
        assert_eq!(fields.get("Conteúdo").unwrap().to_string(), " some payload");
        let empty = decoder.decode("06").unwrap();
        assert_eq!(empty.get("Conteúdo").unwrap().to_string(), "");
    }

    #[test]
    fn test_fn_decoder() {
        fn decode(line: &str) -> Result<FieldMap, FieldError> {
            let mut out = FieldMap::new();
            out.insert("Tamanho", line.len() as i64);
            Ok(out)
        }
        let decoder = FnDecoder::new("len", decode);
        assert_eq!(decoder.name(), "len");
        assert_eq!(
            decoder.decode("01abc").unwrap().get("Tamanho"),
            Some(&FieldValue::Integer(5))
        );
    }
}

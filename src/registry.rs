//! Record type code to decoder dispatch.
//!
//! A `DecoderRegistry` is assembled once through a `RegistryBuilder` and is
//! read-only afterwards. Several codes may point at the same decoder
//! instance when their layouts coincide.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{DecodeError, LineError};
use crate::layout::RecordDecoder;
use crate::record::{DecodedRecord, RecordTypeCode};

/// Outcome of resolving one line against the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A decoder was registered for the line's code and accepted the line.
    Decoded(DecodedRecord),
    /// No decoder is registered for this code.
    Unrecognized(RecordTypeCode),
}

/// Collects decoder registrations before the registry is frozen.
#[derive(Default)]
pub struct RegistryBuilder {
    decoders: HashMap<RecordTypeCode, Arc<dyn RecordDecoder>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `decoder` for `code`, replacing any earlier registration.
    pub fn register<D: RecordDecoder + 'static>(self, code: RecordTypeCode, decoder: D) -> Self {
        self.register_arc(code, Arc::new(decoder))
    }

    /// Register one decoder instance for several codes.
    pub fn register_shared<D: RecordDecoder + 'static>(
        mut self,
        codes: &[RecordTypeCode],
        decoder: D,
    ) -> Self {
        let decoder: Arc<dyn RecordDecoder> = Arc::new(decoder);
        for code in codes {
            self = self.register_arc(*code, Arc::clone(&decoder));
        }
        self
    }

    /// Register an already shared decoder.
    pub fn register_arc(mut self, code: RecordTypeCode, decoder: Arc<dyn RecordDecoder>) -> Self {
        self.decoders.insert(code, decoder);
        self
    }

    pub fn build(self) -> DecoderRegistry {
        DecoderRegistry {
            decoders: self.decoders,
        }
    }
}

/// Immutable mapping from record type code to decoder.
pub struct DecoderRegistry {
    decoders: HashMap<RecordTypeCode, Arc<dyn RecordDecoder>>,
}

impl DecoderRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Start a new builder from this registry's registrations, e.g. to add a
    /// new form version on top of an existing mapping.
    pub fn extend(&self) -> RegistryBuilder {
        RegistryBuilder {
            decoders: self.decoders.clone(),
        }
    }

    pub fn get(&self, code: RecordTypeCode) -> Option<&dyn RecordDecoder> {
        self.decoders.get(&code).map(|d| d.as_ref())
    }

    pub fn contains(&self, code: RecordTypeCode) -> bool {
        self.decoders.contains_key(&code)
    }

    /// Registered codes in sorted order.
    pub fn codes(&self) -> Vec<RecordTypeCode> {
        let mut codes: Vec<RecordTypeCode> = self.decoders.keys().copied().collect();
        codes.sort();
        codes
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Whether both codes are served by the same decoder instance.
    pub fn shares_decoder(&self, a: RecordTypeCode, b: RecordTypeCode) -> bool {
        match (self.decoders.get(&a), self.decoders.get(&b)) {
            (Some(x), Some(y)) => std::ptr::addr_eq(Arc::as_ptr(x), Arc::as_ptr(y)),
            _ => false,
        }
    }

    /// Classify a raw line by its first two characters and decode it.
    ///
    /// An unknown code is a normal outcome (`Resolution::Unrecognized`).
    /// Lines shorter than two characters and decoder failures are errors
    /// left to the caller's policy.
    pub fn resolve_and_decode(&self, raw_line: &str) -> Result<Resolution, LineError> {
        let code = RecordTypeCode::from_line(raw_line).ok_or(LineError::Malformed {
            length: raw_line.chars().count(),
        })?;

        let Some(decoder) = self.decoders.get(&code) else {
            return Ok(Resolution::Unrecognized(code));
        };

        let fields = decoder.decode(raw_line).map_err(|cause| DecodeError {
            code,
            line: raw_line.to_string(),
            cause,
        })?;

        Ok(Resolution::Decoded(DecodedRecord::new(code, fields)))
    }
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for code in self.codes() {
            if let Some(decoder) = self.decoders.get(&code) {
                map.entry(&code.to_string(), &decoder.name());
            }
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;
    use crate::layout::{FieldSpec, LayoutDecoder, PayloadDecoder};
    use crate::record::{FieldValue, TYPE_FIELD};

    const HEADER: RecordTypeCode = RecordTypeCode::from_ascii(*b"0A");
    const DETAIL: RecordTypeCode = RecordTypeCode::from_ascii(*b"01");

    fn detail_layout() -> LayoutDecoder {
        LayoutDecoder::new(
            "detail",
            vec![
                FieldSpec::text("Campo A", 2, 6),
                FieldSpec::integer("Valor A", 8, 3),
                FieldSpec::text("Campo B", 11, 6),
                FieldSpec::integer("Valor B", 17, 3),
            ],
        )
    }

    fn registry() -> DecoderRegistry {
        DecoderRegistry::builder()
            .register(HEADER, PayloadDecoder::new("header", "Cabeçalho"))
            .register(DETAIL, detail_layout())
            .build()
    }

    #[test]
    fn test_decodes_registered_code() {
        let result = registry().resolve_and_decode("01FIELDA001FIELDB002").unwrap();
        let Resolution::Decoded(record) = result else {
            panic!("Expected Decoded");
        };
        assert_eq!(record.code(), DETAIL);
        assert_eq!(record.get("Valor B"), Some(&FieldValue::Integer(2)));
        assert_eq!(record.get(TYPE_FIELD).and_then(|v| v.as_text()), Some("01"));
    }

    #[test]
    fn test_tag_matches_first_two_characters() {
        let reg = registry();
        for line in ["0AHEADER...", "0A", "01FIELDA003FIELDB004"] {
            match reg.resolve_and_decode(line).unwrap() {
                Resolution::Decoded(record) => {
                    assert_eq!(record.code().to_string(), &line[..2]);
                }
                Resolution::Unrecognized(_) => panic!("Expected Decoded for {line}"),
            }
        }
    }

    #[test]
    fn test_unknown_code_is_unrecognized() {
        let result = registry().resolve_and_decode("ZZunknownpayload").unwrap();
        assert_eq!(
            result,
            Resolution::Unrecognized(RecordTypeCode::from_ascii(*b"ZZ"))
        );
    }

    #[test]
    fn test_short_line_is_malformed() {
        assert_eq!(
            registry().resolve_and_decode("0").unwrap_err(),
            LineError::Malformed { length: 1 }
        );
        assert_eq!(
            registry().resolve_and_decode("").unwrap_err(),
            LineError::Malformed { length: 0 }
        );
    }

    #[test]
    fn test_code_only_line_reaches_decoder() {
        let err = registry().resolve_and_decode("01").unwrap_err();
        match err {
            LineError::Decode(DecodeError { code, line, cause }) => {
                assert_eq!(code, DETAIL);
                assert_eq!(line, "01");
                assert!(matches!(cause, FieldError::Truncated { .. }));
            }
            _ => panic!("Expected Decode"),
        }
    }

    #[test]
    fn test_decode_error_propagates() {
        let err = registry()
            .resolve_and_decode("01FIELDAxyzFIELDB002")
            .unwrap_err();
        assert!(matches!(
            err,
            LineError::Decode(DecodeError {
                cause: FieldError::NotNumeric { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_shared_decoder() {
        let odd = [DETAIL, RecordTypeCode::from_ascii(*b"03")];
        let reg = DecoderRegistry::builder()
            .register_shared(&odd, detail_layout())
            .register(HEADER, PayloadDecoder::new("header", "Cabeçalho"))
            .build();
        assert!(reg.shares_decoder(odd[0], odd[1]));
        assert!(!reg.shares_decoder(odd[0], HEADER));
        assert!(!reg.shares_decoder(odd[0], RecordTypeCode::from_ascii(*b"05")));
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn test_extend_leaves_base_registry_unchanged() {
        let base = registry();
        let newer = base
            .extend()
            .register(
                RecordTypeCode::from_ascii(*b"0C"),
                PayloadDecoder::new("v2", "Conteúdo"),
            )
            .build();
        assert!(!base.contains(RecordTypeCode::from_ascii(*b"0C")));
        assert!(newer.contains(RecordTypeCode::from_ascii(*b"0C")));
        assert!(newer.contains(HEADER));
    }

    #[test]
    fn test_codes_sorted() {
        let codes: Vec<String> = registry().codes().iter().map(|c| c.to_string()).collect();
        assert_eq!(codes, vec!["01", "0A"]);
    }

    #[test]
    fn test_debug_lists_decoder_names() {
        let text = format!("{:?}", registry());
        assert!(text.contains("\"0A\": \"header\""));
    }
}

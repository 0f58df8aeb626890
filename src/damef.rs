//! Default DAMEF record type mapping.
//!
//! Record layout (0-based character columns, type code at 0..2):
//!
//! ```text
//! 0A  Identificação   Ano Base(2,4) Inscrição Estadual(6,10) CNPJ(16,14) Razão Social(30,40)
//! 0B  Contabilista    CPF(2,11) Nome(13,40) CRC(53,15)
//! 01  Entradas        CFOP(2,4) Valor Contábil(6,15) Base de Cálculo(21,15) Imposto Creditado(36,15)
//! 03  (same decoder as 01)
//! 02  Saídas          CFOP(2,4) Valor Contábil(6,15) Base de Cálculo(21,15) Imposto Debitado(36,15)
//! 04  (same decoder as 02)
//! 99  Encerramento    Quantidade de Registros(2,8)
//! ```
//!
//! Monetary columns carry two implied decimal places. The remaining codes
//! (06-20, 25, 35, 40) keep their payload as a single `Conteúdo` field.
//! Code 05 has no decoder.

use crate::layout::{FieldSpec, LayoutDecoder, PayloadDecoder};
use crate::record::RecordTypeCode;
use crate::registry::DecoderRegistry;

/// Field name used by payload-only layouts.
pub const PAYLOAD_FIELD: &str = "Conteúdo";

/// Every code the default registry knows.
pub const DAMEF_CODES: [RecordTypeCode; 25] = [
    RecordTypeCode::from_ascii(*b"0A"),
    RecordTypeCode::from_ascii(*b"0B"),
    RecordTypeCode::from_ascii(*b"01"),
    RecordTypeCode::from_ascii(*b"02"),
    RecordTypeCode::from_ascii(*b"03"),
    RecordTypeCode::from_ascii(*b"04"),
    RecordTypeCode::from_ascii(*b"06"),
    RecordTypeCode::from_ascii(*b"07"),
    RecordTypeCode::from_ascii(*b"08"),
    RecordTypeCode::from_ascii(*b"09"),
    RecordTypeCode::from_ascii(*b"10"),
    RecordTypeCode::from_ascii(*b"11"),
    RecordTypeCode::from_ascii(*b"12"),
    RecordTypeCode::from_ascii(*b"13"),
    RecordTypeCode::from_ascii(*b"14"),
    RecordTypeCode::from_ascii(*b"15"),
    RecordTypeCode::from_ascii(*b"16"),
    RecordTypeCode::from_ascii(*b"17"),
    RecordTypeCode::from_ascii(*b"18"),
    RecordTypeCode::from_ascii(*b"19"),
    RecordTypeCode::from_ascii(*b"20"),
    RecordTypeCode::from_ascii(*b"25"),
    RecordTypeCode::from_ascii(*b"35"),
    RecordTypeCode::from_ascii(*b"40"),
    RecordTypeCode::from_ascii(*b"99"),
];

const IDENTIFICATION: RecordTypeCode = RecordTypeCode::from_ascii(*b"0A");
const ACCOUNTANT: RecordTypeCode = RecordTypeCode::from_ascii(*b"0B");
const INBOUND: [RecordTypeCode; 2] = [
    RecordTypeCode::from_ascii(*b"01"),
    RecordTypeCode::from_ascii(*b"03"),
];
const OUTBOUND: [RecordTypeCode; 2] = [
    RecordTypeCode::from_ascii(*b"02"),
    RecordTypeCode::from_ascii(*b"04"),
];
const TRAILER: RecordTypeCode = RecordTypeCode::from_ascii(*b"99");

pub fn identification_layout() -> LayoutDecoder {
    LayoutDecoder::new(
        "identificação",
        vec![
            FieldSpec::integer("Ano Base", 2, 4),
            FieldSpec::text("Inscrição Estadual", 6, 10),
            FieldSpec::text("CNPJ", 16, 14),
            FieldSpec::text("Razão Social", 30, 40),
        ],
    )
}

pub fn accountant_layout() -> LayoutDecoder {
    LayoutDecoder::new(
        "contabilista",
        vec![
            FieldSpec::text("CPF do Contabilista", 2, 11),
            FieldSpec::text("Nome do Contabilista", 13, 40),
            FieldSpec::text("CRC", 53, 15),
        ],
    )
}

fn movement_layout(name: &str, tax_field: &str) -> LayoutDecoder {
    LayoutDecoder::new(
        name,
        vec![
            FieldSpec::text("CFOP", 2, 4),
            FieldSpec::decimal("Valor Contábil", 6, 15, 2),
            FieldSpec::decimal("Base de Cálculo", 21, 15, 2),
            FieldSpec::decimal(tax_field, 36, 15, 2),
        ],
    )
}

pub fn inbound_layout() -> LayoutDecoder {
    movement_layout("entradas", "Imposto Creditado")
}

pub fn outbound_layout() -> LayoutDecoder {
    movement_layout("saídas", "Imposto Debitado")
}

pub fn trailer_layout() -> LayoutDecoder {
    LayoutDecoder::new(
        "encerramento",
        vec![FieldSpec::integer("Quantidade de Registros", 2, 8)],
    )
}

/// Registry with the full DAMEF code set.
pub fn default_registry() -> DecoderRegistry {
    let mut builder = DecoderRegistry::builder()
        .register(IDENTIFICATION, identification_layout())
        .register(ACCOUNTANT, accountant_layout())
        .register_shared(&INBOUND, inbound_layout())
        .register_shared(&OUTBOUND, outbound_layout())
        .register(TRAILER, trailer_layout());

    for code in DAMEF_CODES {
        if code == IDENTIFICATION
            || code == ACCOUNTANT
            || code == TRAILER
            || INBOUND.contains(&code)
            || OUTBOUND.contains(&code)
        {
            continue;
        }
        builder = builder.register(
            code,
            PayloadDecoder::new(format!("registro {code}"), PAYLOAD_FIELD),
        );
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FieldValue, TYPE_FIELD};
    use crate::registry::Resolution;
    use pretty_assertions::assert_eq;

    fn decode(line: &str) -> crate::record::DecodedRecord {
        match default_registry().resolve_and_decode(line).unwrap() {
            Resolution::Decoded(record) => record,
            Resolution::Unrecognized(code) => panic!("Unrecognized {code}"),
        }
    }

    #[test]
    fn test_registers_every_code() {
        let registry = default_registry();
        assert_eq!(registry.len(), DAMEF_CODES.len());
        for code in DAMEF_CODES {
            assert!(registry.contains(code), "missing {code}");
        }
    }

    #[test]
    fn test_code_05_not_registered() {
        let result = default_registry().resolve_and_decode("05whatever").unwrap();
        assert_eq!(
            result,
            Resolution::Unrecognized(RecordTypeCode::from_ascii(*b"05"))
        );
    }

    #[test]
    fn test_shared_layouts() {
        let registry = default_registry();
        assert!(registry.shares_decoder(INBOUND[0], INBOUND[1]));
        assert!(registry.shares_decoder(OUTBOUND[0], OUTBOUND[1]));
        assert!(!registry.shares_decoder(INBOUND[0], OUTBOUND[0]));
    }

    #[test]
    fn test_identification_record() {
        let line = format!("0A2023{:<10}{:<14}{:<40}", "0961234567", "12345678000190", "ACME COMÉRCIO LTDA");
        let record = decode(&line);
        assert_eq!(record.get("Ano Base"), Some(&FieldValue::Integer(2023)));
        assert_eq!(record.get("CNPJ").unwrap().to_string(), "12345678000190");
        assert_eq!(
            record.get("Razão Social").unwrap().to_string(),
            "ACME COMÉRCIO LTDA"
        );
    }

    #[test]
    fn test_inbound_and_outbound_records() {
        let inbound = decode("011102000000000150000000000000150000000000000027000");
        assert_eq!(inbound.get("CFOP").unwrap().to_string(), "1102");
        assert_eq!(inbound.get("Valor Contábil"), Some(&FieldValue::Decimal(1500.0)));
        assert_eq!(inbound.get("Imposto Creditado"), Some(&FieldValue::Decimal(270.0)));

        let outbound = decode("045102000000000010050000000000010050000000000001809");
        assert_eq!(outbound.get(TYPE_FIELD).unwrap().to_string(), "04");
        assert_eq!(outbound.get("Imposto Debitado"), Some(&FieldValue::Decimal(18.09)));
        assert!(outbound.get("Imposto Creditado").is_none());
    }

    #[test]
    fn test_trailer_record() {
        let record = decode("9900000012");
        assert_eq!(
            record.get("Quantidade de Registros"),
            Some(&FieldValue::Integer(12))
        );
    }

    #[test]
    fn test_payload_record() {
        let record = decode("35OUTRAS INFORMACOES   ");
        assert_eq!(
            record.get(PAYLOAD_FIELD).unwrap().to_string(),
            "OUTRAS INFORMACOES"
        );
    }

    #[test]
    fn test_short_inbound_record_fails() {
        assert!(default_registry().resolve_and_decode("011102").is_err());
    }
}

//! # damef-rs
//!
//! Decoding of DAMEF business-registry extracts into tabular records.
//!
//! A DAMEF file is line-oriented text where the first two characters of
//! every line name its record type and the remaining columns follow a
//! fixed-width layout specific to that type. Decoding works in two parts:
//!
//! - **Decoder registry**: maps each record type code to a decoder that
//!   turns one raw line into named fields. Unknown codes are reported,
//!   never fatal.
//! - **Batch processor**: streams a file line by line through the
//!   registry and collects the rows, in file order, into a `RecordTable`
//!   whose columns are the union of every decoded field.
//!
//! ## Example
//!
//! ```
//! use damef_rs::{
//!     BatchProcessor, DecoderRegistry, FieldSpec, LayoutDecoder, PayloadDecoder,
//!     RecordTypeCode, TYPE_FIELD,
//! };
//!
//! let registry = DecoderRegistry::builder()
//!     .register(
//!         RecordTypeCode::from_ascii(*b"0A"),
//!         PayloadDecoder::new("header", "Cabeçalho"),
//!     )
//!     .register(
//!         RecordTypeCode::from_ascii(*b"01"),
//!         LayoutDecoder::new(
//!             "detail",
//!             vec![FieldSpec::text("Campo", 2, 6), FieldSpec::integer("Valor", 8, 3)],
//!         ),
//!     )
//!     .build();
//!
//! let input = "0AHEADER\n01FIELDA001\nZZunknown\n01FIELDA003\n";
//! let outcome = BatchProcessor::new(&registry)
//!     .process_reader(input.as_bytes())
//!     .unwrap();
//!
//! assert_eq!(outcome.table.len(), 3);
//! assert_eq!(outcome.diagnostics.len(), 1);
//! assert_eq!(outcome.table.cell(1, TYPE_FIELD).unwrap().to_string(), "01");
//! ```

pub mod damef;
pub mod error;
pub mod export;
pub mod filter;
pub mod layout;
pub mod logging;
pub mod processor;
pub mod record;
pub mod registry;
pub mod table;

pub use damef::default_registry;
pub use error::{CodeError, DecodeError, ExportError, FieldError, LineError, ProcessError};
pub use export::{DEFAULT_EXPORT_FILE, export_csv, write_csv};
pub use filter::TypeFilter;
pub use layout::{FieldKind, FieldSpec, FnDecoder, LayoutDecoder, PayloadDecoder, RecordDecoder};
pub use processor::{BatchProcessor, Diagnostic, DiagnosticKind, ProcessOutcome, process_file};
pub use record::{DecodedRecord, FieldMap, FieldValue, RecordTypeCode, TYPE_FIELD};
pub use registry::{DecoderRegistry, RegistryBuilder, Resolution};
pub use table::RecordTable;

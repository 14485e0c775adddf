//! Decoder library for VSE004 capture files.
//!
//! VSE004 is the binary container written by ifm VSE vibration diagnostics
//! units (`.idat` files). A capture holds two fixed-size headers, a run of
//! data-source descriptor records and at most one raw sample block.
//!
//! # Example
//!
//! ```no_run
//! use vse_core::VseDecoder;
//!
//! let decoder = VseDecoder::new();
//! let result = decoder.decode_file("Rawdata_BearingUnit.idat").unwrap();
//!
//! println!("Capture: {}", result.header.ves.name);
//! println!("Decoded {} of {} data sources", result.stats.decoded, result.stats.declared);
//! ```
//!
//! # Features
//!
//! - Explicit byte offsets for every field, no reliance on struct packing
//! - Truncated captures decode to partial results instead of failing
//! - Zero padding trimmed from parameter and sample arrays
//! - JSON and CSV output writers

pub mod decoder;
pub mod header;
pub mod output;
pub mod parser;
pub mod source;
pub mod stream;
pub mod trim;
pub mod types;

// Re-export commonly used types
pub use decoder::{parse_file, DecodeError, DecoderOptions, VseDecoder};
pub use output::{OutputError, OutputFormat};
pub use trim::{trim_zeros, DEFAULT_TOLERANCE};
pub use types::{
    DataSourceRecord, DataStreamRecord, DevData, FileHeader, ParseResult, PrimaryHeader,
    SecondaryHeader, Section, SourceStats, TruncationNotice,
};

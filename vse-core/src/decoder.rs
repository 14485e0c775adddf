//! Whole-file VSE004 decoding.
//!
//! The decoder walks the buffer front to back: both headers, then up to
//! `dataSourceCount` data-source records, then an optional raw sample block.
//! Header failures abort the parse. A capture that ends early still yields
//! the sections that fit, with a [`TruncationNotice`] for each section that
//! did not.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use crate::header::{decode_primary_header, decode_secondary_header};
use crate::source::{decode_data_source, DATA_SOURCE_LEN};
use crate::stream::decode_data_stream;
use crate::trim::{trim_zeros, DEFAULT_TOLERANCE};
use crate::types::{FileHeader, ParseResult, Section, SourceStats, TruncationNotice};

/// Errors that can occur during VSE004 decoding.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("buffer too small for {section}: expected at least {expected} bytes, got {actual}")]
    Size {
        section: Section,
        expected: usize,
        actual: usize,
    },
}

/// Decoder settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecoderOptions {
    /// Magnitude at or below which boundary values are dropped as padding.
    pub trim_tolerance: f64,
    /// Whether float arrays are trimmed at all.
    pub trim: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            trim_tolerance: DEFAULT_TOLERANCE,
            trim: true,
        }
    }
}

impl DecoderOptions {
    pub(crate) fn apply_trim(&self, values: Vec<f32>) -> Vec<f32> {
        if self.trim {
            trim_zeros(&values, self.trim_tolerance)
        } else {
            values
        }
    }
}

/// VSE004 capture decoder.
///
/// Holds only its options, so one decoder can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct VseDecoder {
    options: DecoderOptions,
}

impl VseDecoder {
    /// Creates a decoder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder with the given options.
    pub fn with_options(options: DecoderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Decodes a complete capture held in memory.
    pub fn parse(&self, data: &[u8]) -> Result<ParseResult, DecodeError> {
        let (ves, mut offset) = decode_primary_header(data)?;
        let (df, used) = decode_secondary_header(&data[offset..])?;
        offset += used;
        debug!(
            name = %ves.name,
            declared = df.data_source_count,
            offset,
            "decoded headers"
        );

        let mut notices = Vec::new();
        let declared = df.data_source_count;
        let mut data_sources = Vec::new();

        for _ in 0..declared {
            let remaining = data.len() - offset;
            if remaining < DATA_SOURCE_LEN {
                let notice = TruncationNotice {
                    section: Section::DataSource,
                    offset,
                    needed: DATA_SOURCE_LEN,
                    available: remaining,
                };
                warn!(
                    decoded = data_sources.len(),
                    declared,
                    "reached end of buffer before all data sources: {notice}"
                );
                notices.push(notice);
                break;
            }
            let (source, used) = decode_data_source(&data[offset..], &self.options)?;
            data_sources.push(source);
            offset += used;
        }

        let stats = SourceStats {
            declared,
            decoded: data_sources.len(),
        };

        let mut raw_data_stream = None;
        if offset < data.len() {
            match decode_data_stream(&data[offset..], &self.options) {
                Ok((stream, used)) => {
                    offset += used;
                    raw_data_stream = Some(stream);
                }
                Err(DecodeError::Size {
                    section,
                    expected,
                    actual,
                }) => {
                    let notice = TruncationNotice {
                        section,
                        offset,
                        needed: expected,
                        available: actual,
                    };
                    warn!("skipping raw data stream: {notice}");
                    notices.push(notice);
                }
                Err(other) => return Err(other),
            }
        }

        if offset < data.len() {
            debug!(trailing = data.len() - offset, "ignoring trailing bytes");
        }

        Ok(ParseResult {
            header: FileHeader { ves, df },
            data_sources,
            raw_data_stream,
            stats,
            notices,
        })
    }

    /// Reads a capture file fully into memory and decodes it.
    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> Result<ParseResult, DecodeError> {
        let data = fs::read(path.as_ref())?;
        debug!(path = %path.as_ref().display(), bytes = data.len(), "read capture file");
        self.parse(&data)
    }
}

/// Decodes a capture with default options.
pub fn parse_file(data: &[u8]) -> Result<ParseResult, DecodeError> {
    VseDecoder::new().parse(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{PRIMARY_HEADER_LEN, SECONDARY_HEADER_LEN};
    use crate::stream::DATA_STREAM_LEN;

    fn headers(count: u32) -> Vec<u8> {
        let mut buf = vec![0u8; PRIMARY_HEADER_LEN + SECONDARY_HEADER_LEN];
        let at = PRIMARY_HEADER_LEN + 12;
        buf[at..at + 4].copy_from_slice(&count.to_le_bytes());
        buf
    }

    #[test]
    fn test_default_options() {
        let options = DecoderOptions::default();
        assert!(options.trim);
        assert_eq!(options.trim_tolerance, 1e-9);
        assert_eq!(options.apply_trim(vec![0.0, 1.0]), vec![1.0]);
    }

    #[test]
    fn test_no_sources_no_stream() {
        let result = parse_file(&headers(0)).unwrap();
        assert!(result.data_sources.is_empty());
        assert!(result.raw_data_stream.is_none());
        assert!(!result.is_truncated());
    }

    #[test]
    fn test_header_failure_is_fatal() {
        let buf = headers(0);
        assert!(parse_file(&buf[..PRIMARY_HEADER_LEN + 10]).is_err());
        assert!(parse_file(&buf[..10]).is_err());
    }

    #[test]
    fn test_declared_sources_missing() {
        let result = parse_file(&headers(5)).unwrap();
        assert!(result.data_sources.is_empty());
        assert_eq!(result.stats.declared, 5);
        assert_eq!(result.stats.decoded, 0);
        assert_eq!(result.notices.len(), 1);
        assert_eq!(result.notices[0].available, 0);
    }

    #[test]
    fn test_partial_record_becomes_stream_notice() {
        let mut buf = headers(1);
        buf.extend(vec![0u8; DATA_SOURCE_LEN - 1]);
        let result = parse_file(&buf).unwrap();
        assert!(result.data_sources.is_empty());
        assert!(result.raw_data_stream.is_none());
        let sections: Vec<_> = result.notices.iter().map(|n| n.section).collect();
        assert_eq!(sections, vec![Section::DataSource, Section::DataStream]);
    }

    #[test]
    fn test_stream_after_sources() {
        let mut buf = headers(1);
        buf.extend(vec![0u8; DATA_SOURCE_LEN + DATA_STREAM_LEN]);
        let result = parse_file(&buf).unwrap();
        assert_eq!(result.data_sources.len(), 1);
        let stream = result.raw_data_stream.unwrap();
        assert!(stream.values.is_empty());
    }

    #[test]
    fn test_decoder_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VseDecoder>();
    }
}

//! The trailing raw sample block.
//!
//! # Layout (16420 bytes)
//!
//! | Offset     | Field             | Type        |
//! |------------|-------------------|-------------|
//! | 0-7        | dataSourceHandle  | u64         |
//! | 8-11       | flags             | u32         |
//! | 12-15      | padding           | -           |
//! | 16-23      | timestamp         | u64         |
//! | 24-27      | valueCount        | u32         |
//! | 28-31      | sampleRateDivider | u32         |
//! | 32-35      | engUnit           | u32         |
//! | 36-16419   | values            | 4096 x f32  |
//!
//! The padding at 12 comes from the recording software aligning the 64-bit
//! timestamp to 8 bytes.

use tracing::trace;

use crate::decoder::{DecodeError, DecoderOptions};
use crate::parser::{ensure_len, read_f32_vec, read_u32, read_u64};
use crate::types::{DataStreamRecord, Section};

/// Number of sample slots in a stream block.
pub const SAMPLE_COUNT: usize = 4096;

/// Size of a stream block in bytes.
pub const DATA_STREAM_LEN: usize = VALUES_OFFSET + SAMPLE_COUNT * 4;

const VALUES_OFFSET: usize = 36;

/// Decodes the raw sample block from the start of `data`.
///
/// `valueCount` is reported as read and never used to cut the samples; only
/// the zero padding at either end is dropped.
pub fn decode_data_stream(
    data: &[u8],
    options: &DecoderOptions,
) -> Result<(DataStreamRecord, usize), DecodeError> {
    ensure_len(Section::DataStream, data, DATA_STREAM_LEN)?;

    let values = read_f32_vec(data, VALUES_OFFSET, SAMPLE_COUNT);

    let record = DataStreamRecord {
        data_source_handle: read_u64(data, 0),
        flags: read_u32(data, 8),
        timestamp: read_u64(data, 16),
        value_count: read_u32(data, 24),
        sample_rate_divider: read_u32(data, 28),
        eng_unit: read_u32(data, 32),
        values: options.apply_trim(values),
    };

    trace!(
        handle = record.data_source_handle,
        declared = record.value_count,
        kept = record.values.len(),
        "decoded data stream"
    );
    Ok((record, DATA_STREAM_LEN))
}

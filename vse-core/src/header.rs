//! The two fixed-size headers at the start of every capture.
//!
//! # Primary header (1660 bytes)
//!
//! | Offset    | Field       | Type            |
//! |-----------|-------------|-----------------|
//! | 0-19      | prefix      | bytes (skipped) |
//! | 20-23     | yosiVersion | u32             |
//! | 24-27     | dataVersion | u32             |
//! | 28-31     | dataSize    | u32             |
//! | 32-35     | id          | u32             |
//! | 36-39     | plugIn      | u32             |
//! | 40-43     | type        | u32             |
//! | 44-47     | subType     | u32             |
//! | 48-559    | name        | UTF-16, 512 B   |
//! | 560-639   | uuid        | UTF-16, 80 B    |
//! | 640-1659  | reserved    | skipped         |
//!
//! # Secondary header (880 bytes)
//!
//! | Offset    | Field           | Type |
//! |-----------|-----------------|------|
//! | 0-3       | version         | u32  |
//! | 4-7       | yosemite        | u32  |
//! | 8-11      | type            | u32  |
//! | 12-15     | dataSourceCount | u32  |
//! | 16-19     | recordSize      | u32  |
//! | 20-23     | timezone        | u32  |
//! | 24-31     | creationTime    | u64  |
//! | 32-39     | timeRangeStart  | u64  |
//! | 40-47     | timeRangeEnd    | u64  |
//! | 48-51     | rawDataMetaData | u32  |
//! | 52-879    | reserved        | 207 x u32, first surfaced |

use crate::decoder::DecodeError;
use crate::parser::{ensure_len, read_u32, read_u64, read_utf16};
use crate::types::{PrimaryHeader, SecondaryHeader, Section};

/// Size of the primary header in bytes.
pub const PRIMARY_HEADER_LEN: usize = 1660;

/// Size of the secondary header in bytes.
pub const SECONDARY_HEADER_LEN: usize = 880;

const NAME_OFFSET: usize = 48;
const NAME_LEN: usize = 512;
const UUID_OFFSET: usize = 560;
const UUID_LEN: usize = 80;

/// Decodes the primary header from the start of `data`.
///
/// Returns the header and the number of bytes it occupies.
pub fn decode_primary_header(data: &[u8]) -> Result<(PrimaryHeader, usize), DecodeError> {
    ensure_len(Section::PrimaryHeader, data, PRIMARY_HEADER_LEN)?;

    let header = PrimaryHeader {
        yosi_version: read_u32(data, 20),
        data_version: read_u32(data, 24),
        data_size: read_u32(data, 28),
        id: read_u32(data, 32),
        plug_in: read_u32(data, 36),
        kind: read_u32(data, 40),
        sub_type: read_u32(data, 44),
        name: read_utf16(data, NAME_OFFSET, NAME_LEN),
        uuid: read_utf16(data, UUID_OFFSET, UUID_LEN),
    };

    Ok((header, PRIMARY_HEADER_LEN))
}

/// Decodes the secondary header from the start of `data`.
///
/// `data` must begin right after the primary header.
pub fn decode_secondary_header(data: &[u8]) -> Result<(SecondaryHeader, usize), DecodeError> {
    ensure_len(Section::SecondaryHeader, data, SECONDARY_HEADER_LEN)?;

    let header = SecondaryHeader {
        version: read_u32(data, 0),
        yosemite: read_u32(data, 4),
        kind: read_u32(data, 8),
        data_source_count: read_u32(data, 12),
        record_size: read_u32(data, 16),
        timezone: read_u32(data, 20),
        creation_time: read_u64(data, 24),
        time_range_start: read_u64(data, 32),
        time_range_end: read_u64(data, 40),
        raw_data_meta_data: read_u32(data, 48),
        reserved: read_u32(data, 52),
    };

    Ok((header, SECONDARY_HEADER_LEN))
}

//! Data-source descriptor records.
//!
//! A data source describes one sensor channel. The record is 2308 bytes:
//!
//! | Offset    | Field              | Type          |
//! |-----------|--------------------|---------------|
//! | 0-7       | handle             | u64           |
//! | 8-15      | parent             | u64           |
//! | 16-19     | plugIn             | u32           |
//! | 20-23     | type               | u32           |
//! | 24-27     | subType            | u32           |
//! | 28-31     | engUnit            | u32           |
//! | 32-39     | valueID            | u64           |
//! | 40-47     | address            | u64           |
//! | 48-55     | flags              | u64           |
//! | 56-59     | deviceID           | u32           |
//! | 60-315    | deviceUUID         | UTF-16, 256 B |
//! | 316-571   | name               | UTF-16, 256 B |
//! | 572-827   | inputName          | UTF-16, 256 B |
//! | 828-1083  | unitString         | UTF-16, 256 B |
//! | 1084-1111 | parameters         | 7 x f32       |
//! | 1112-1115 | objectType         | u32           |
//! | 1116-1371 | deviceName         | UTF-16, 256 B |
//! | 1372-1375 | deviceType         | u32           |
//! | 1376-1631 | deviceSerialNumber | UTF-16, 256 B |
//! | 1632-1887 | deviceAddress      | UTF-16, 256 B |
//! | 1888-1891 | devSize            | u32           |
//! | 1892-2307 | devData            | 416 B         |

use tracing::trace;

use crate::decoder::{DecodeError, DecoderOptions};
use crate::parser::{ensure_len, read_bytes, read_f32_vec, read_u32, read_u64, read_utf16};
use crate::types::{DataSourceRecord, DevData, Section};

/// Size of one data-source record in bytes.
pub const DATA_SOURCE_LEN: usize = 2308;

/// Number of floats in the parameter block.
pub const PARAMETER_COUNT: usize = 7;

/// Size of the device payload region at the end of the record.
pub const DEV_DATA_LEN: usize = 416;

const TEXT_LEN: usize = 256;
const PARAMETERS_OFFSET: usize = 1084;
const DEV_SIZE_OFFSET: usize = 1888;
const DEV_DATA_OFFSET: usize = 1892;

/// Decodes one data-source record from the start of `data`.
///
/// The declared `devSize` only decides whether a payload is present. When it
/// is non-zero the whole payload region is hex encoded, whatever its declared
/// length.
pub fn decode_data_source(
    data: &[u8],
    options: &DecoderOptions,
) -> Result<(DataSourceRecord, usize), DecodeError> {
    ensure_len(Section::DataSource, data, DATA_SOURCE_LEN)?;

    let dev_size = read_u32(data, DEV_SIZE_OFFSET);
    let dev_data = if dev_size == 0 {
        DevData::Empty
    } else {
        DevData::Hex(hex::encode(read_bytes(data, DEV_DATA_OFFSET, DEV_DATA_LEN)))
    };

    let parameters = read_f32_vec(data, PARAMETERS_OFFSET, PARAMETER_COUNT);

    let record = DataSourceRecord {
        handle: read_u64(data, 0),
        parent: read_u64(data, 8),
        plug_in: read_u32(data, 16),
        kind: read_u32(data, 20),
        sub_type: read_u32(data, 24),
        eng_unit: read_u32(data, 28),
        value_id: read_u64(data, 32),
        address: read_u64(data, 40),
        flags: read_u64(data, 48),
        device_id: read_u32(data, 56),
        device_uuid: read_utf16(data, 60, TEXT_LEN),
        name: read_utf16(data, 316, TEXT_LEN),
        input_name: read_utf16(data, 572, TEXT_LEN),
        unit_string: read_utf16(data, 828, TEXT_LEN),
        parameters: options.apply_trim(parameters),
        object_type: read_u32(data, 1112),
        device_name: read_utf16(data, 1116, TEXT_LEN),
        device_type: read_u32(data, 1372),
        device_serial_number: read_utf16(data, 1376, TEXT_LEN),
        device_address: read_utf16(data, 1632, TEXT_LEN),
        dev_size,
        dev_data,
    };

    trace!(handle = record.handle, name = %record.name, "decoded data source");
    Ok((record, DATA_SOURCE_LEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(f: impl FnOnce(&mut [u8])) -> Vec<u8> {
        let mut buf = vec![0u8; DATA_SOURCE_LEN];
        f(&mut buf);
        buf
    }

    fn put_f32s(buf: &mut [u8], offset: usize, values: &[f32]) {
        for (i, v) in values.iter().enumerate() {
            buf[offset + i * 4..offset + i * 4 + 4].copy_from_slice(&v.to_le_bytes());
        }
    }

    #[test]
    fn test_too_short_reports_expected_and_actual() {
        let buf = vec![0u8; 100];
        let err = decode_data_source(&buf, &DecoderOptions::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "buffer too small for data source: expected at least 2308 bytes, got 100"
        );
    }

    #[test]
    fn test_zero_dev_size_gives_sentinel() {
        let buf = record_with(|b| b[DEV_DATA_OFFSET] = 0xAB);
        let (record, used) = decode_data_source(&buf, &DecoderOptions::default()).unwrap();
        assert_eq!(used, DATA_SOURCE_LEN);
        assert_eq!(record.dev_size, 0);
        assert_eq!(record.dev_data, DevData::Empty);
    }

    #[test]
    fn test_dev_data_encodes_whole_region() {
        let buf = record_with(|b| {
            b[DEV_SIZE_OFFSET..DEV_SIZE_OFFSET + 4].copy_from_slice(&4u32.to_le_bytes());
            b[DEV_DATA_OFFSET..DEV_DATA_OFFSET + 4].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        });
        let (record, _) = decode_data_source(&buf, &DecoderOptions::default()).unwrap();
        let hex = record.dev_data.as_hex().unwrap();
        assert_eq!(hex.len(), DEV_DATA_LEN * 2);
        assert!(hex.starts_with("deadbeef00"));
    }

    #[test]
    fn test_parameters_trimmed() {
        let buf = record_with(|b| {
            put_f32s(b, PARAMETERS_OFFSET, &[0.0, 0.0, 1.5, 0.0, 2.5, 0.0, 0.0]);
        });
        let (record, _) = decode_data_source(&buf, &DecoderOptions::default()).unwrap();
        assert_eq!(record.parameters, vec![1.5, 0.0, 2.5]);

        let raw = DecoderOptions {
            trim: false,
            ..DecoderOptions::default()
        };
        let (record, _) = decode_data_source(&buf, &raw).unwrap();
        assert_eq!(record.parameters.len(), PARAMETER_COUNT);
    }

    #[test]
    fn test_wide_integer_fields() {
        let buf = record_with(|b| {
            b[0..8].copy_from_slice(&0x1122_3344_5566_7788u64.to_le_bytes());
            b[32..40].copy_from_slice(&(u32::MAX as u64 + 1).to_le_bytes());
            b[56..60].copy_from_slice(&42u32.to_le_bytes());
            b[1372..1376].copy_from_slice(&7u32.to_le_bytes());
        });
        let (record, _) = decode_data_source(&buf, &DecoderOptions::default()).unwrap();
        assert_eq!(record.handle, 0x1122_3344_5566_7788);
        assert_eq!(record.value_id, u32::MAX as u64 + 1);
        assert_eq!(record.device_id, 42);
        assert_eq!(record.device_type, 7);
    }
}

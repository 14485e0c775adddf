//! Decoded VSE004 records.
//!
//! All records are plain values built once by their decoder. They serialize
//! with the key names used by the VSE tooling (`plugIn`, `valueID`, ...), so
//! the JSON output can stand in for the vendor's own export.

use serde::{Serialize, Serializer};
use std::fmt;

/// The block of the capture file a decode step works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// The leading VSE header
    PrimaryHeader,
    /// The data-file header that follows it
    SecondaryHeader,
    /// One sensor descriptor record
    DataSource,
    /// The trailing raw sample block
    DataStream,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PrimaryHeader => "primary header",
            Self::SecondaryHeader => "secondary header",
            Self::DataSource => "data source",
            Self::DataStream => "data stream",
        };
        f.write_str(name)
    }
}

/// The primary ("VSE") file header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryHeader {
    pub yosi_version: u32,
    pub data_version: u32,
    pub data_size: u32,
    pub id: u32,
    pub plug_in: u32,
    #[serde(rename = "type")]
    pub kind: u32,
    pub sub_type: u32,
    /// Capture name
    pub name: String,
    /// Capture identifier text
    pub uuid: String,
}

/// The secondary ("data file") header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryHeader {
    pub version: u32,
    pub yosemite: u32,
    #[serde(rename = "type")]
    pub kind: u32,
    /// Number of data-source records announced by the file.
    ///
    /// This is an upper bound; truncated captures hold fewer.
    pub data_source_count: u32,
    pub record_size: u32,
    pub timezone: u32,
    pub creation_time: u64,
    pub time_range_start: u64,
    pub time_range_end: u64,
    pub raw_data_meta_data: u32,
    /// First word of the reserved area
    #[serde(rename = "m_reserved")]
    pub reserved: u32,
}

/// Device-specific payload attached to a data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevData {
    /// The record declares no payload. Serializes as the number `0`.
    Empty,
    /// Lowercase hex of the payload region.
    Hex(String),
}

impl DevData {
    /// Returns the hex text, if any.
    pub fn as_hex(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Hex(hex) => Some(hex),
        }
    }
}

impl Serialize for DevData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_u8(0),
            Self::Hex(hex) => serializer.serialize_str(hex),
        }
    }
}

/// One sensor/channel descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceRecord {
    pub handle: u64,
    pub parent: u64,
    pub plug_in: u32,
    #[serde(rename = "type")]
    pub kind: u32,
    pub sub_type: u32,
    pub eng_unit: u32,
    #[serde(rename = "valueID")]
    pub value_id: u64,
    pub address: u64,
    pub flags: u64,
    #[serde(rename = "deviceID")]
    pub device_id: u32,
    #[serde(rename = "deviceUUID")]
    pub device_uuid: String,
    pub name: String,
    pub input_name: String,
    pub unit_string: String,
    /// Channel parameters with zero padding trimmed
    pub parameters: Vec<f32>,
    pub object_type: u32,
    pub device_name: String,
    pub device_type: u32,
    pub device_serial_number: String,
    pub device_address: String,
    /// Declared payload size in bytes
    pub dev_size: u32,
    pub dev_data: DevData,
}

/// The trailing raw sample block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStreamRecord {
    /// Handle of the data source these samples belong to
    pub data_source_handle: u64,
    pub flags: u32,
    pub timestamp: u64,
    /// Sample count announced by the device. Informational only.
    pub value_count: u32,
    pub sample_rate_divider: u32,
    pub eng_unit: u32,
    /// Samples with zero padding trimmed from both ends
    pub values: Vec<f32>,
}

/// Both file headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileHeader {
    pub ves: PrimaryHeader,
    pub df: SecondaryHeader,
}

/// Counts of announced versus decoded data sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    /// `dataSourceCount` from the secondary header
    pub declared: u32,
    /// Records actually present in the buffer
    pub decoded: usize,
}

impl SourceStats {
    /// True when fewer records were decoded than announced.
    pub fn is_partial(&self) -> bool {
        self.decoded < self.declared as usize
    }
}

/// A section that could not be decoded because the buffer ran out.
///
/// Notices are diagnostics only; the section is simply left out of the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationNotice {
    pub section: Section,
    /// Offset of the section in the file
    pub offset: usize,
    /// Bytes the section needs
    pub needed: usize,
    /// Bytes left in the buffer
    pub available: usize,
}

impl fmt::Display for TruncationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at offset {} needs {} bytes, {} available",
            self.section, self.offset, self.needed, self.available
        )
    }
}

/// Result of decoding a VSE004 capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub header: FileHeader,
    /// Data sources in file order
    pub data_sources: Vec<DataSourceRecord>,
    pub raw_data_stream: Option<DataStreamRecord>,
    #[serde(skip)]
    pub stats: SourceStats,
    #[serde(skip)]
    pub notices: Vec<TruncationNotice>,
}

impl ParseResult {
    /// True when any section was cut short.
    pub fn is_truncated(&self) -> bool {
        !self.notices.is_empty()
    }
}

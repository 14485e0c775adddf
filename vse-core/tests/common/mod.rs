//! Synthetic VSE004 capture builder for tests and benchmarks.
//!
//! Offsets are written out by hand here rather than taken from the library,
//! so the tests pin the layout independently.

#![allow(dead_code)]

pub const PRIMARY_LEN: usize = 1660;
pub const SECONDARY_LEN: usize = 880;
pub const SOURCE_LEN: usize = 2308;
pub const STREAM_LEN: usize = 16420;

fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_u64(buf: &mut [u8], offset: usize, value: u64) {
    buf[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}

fn put_f32s(buf: &mut [u8], offset: usize, values: &[f32]) {
    for (i, v) in values.iter().enumerate() {
        let at = offset + i * 4;
        buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
    }
}

fn put_text(buf: &mut [u8], offset: usize, width: usize, text: &str) {
    let bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
    assert!(bytes.len() <= width, "text does not fit field");
    buf[offset..offset + bytes.len()].copy_from_slice(&bytes);
}

/// Primary header contents.
#[derive(Debug, Clone, Default)]
pub struct Primary {
    pub yosi_version: u32,
    pub data_version: u32,
    pub id: u32,
    pub name: String,
    pub uuid: String,
}

impl Primary {
    pub fn named(name: &str, uuid: &str) -> Self {
        Self {
            yosi_version: 4,
            data_version: 1,
            id: 17,
            name: name.to_string(),
            uuid: uuid.to_string(),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; PRIMARY_LEN];
        buf[..6].copy_from_slice(b"VSE004");
        put_u32(&mut buf, 20, self.yosi_version);
        put_u32(&mut buf, 24, self.data_version);
        put_u32(&mut buf, 32, self.id);
        put_text(&mut buf, 48, 512, &self.name);
        put_text(&mut buf, 560, 80, &self.uuid);
        buf
    }
}

/// Secondary header contents.
#[derive(Debug, Clone, Default)]
pub struct Secondary {
    pub data_source_count: u32,
    pub timezone: u32,
    pub creation_time: u64,
    pub time_range_start: u64,
    pub time_range_end: u64,
}

impl Secondary {
    pub fn with_count(count: u32) -> Self {
        Self {
            data_source_count: count,
            timezone: 60,
            creation_time: 1_718_000_000,
            time_range_start: 1_718_000_100,
            time_range_end: 1_718_000_200,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; SECONDARY_LEN];
        put_u32(&mut buf, 0, 2);
        put_u32(&mut buf, 12, self.data_source_count);
        put_u32(&mut buf, 16, SOURCE_LEN as u32);
        put_u32(&mut buf, 20, self.timezone);
        put_u64(&mut buf, 24, self.creation_time);
        put_u64(&mut buf, 32, self.time_range_start);
        put_u64(&mut buf, 40, self.time_range_end);
        buf
    }
}

/// Data-source record contents.
#[derive(Debug, Clone, Default)]
pub struct Source {
    pub handle: u64,
    pub parent: u64,
    pub name: String,
    pub unit: String,
    pub device_name: String,
    pub parameters: [f32; 7],
    pub dev_size: u32,
    pub dev_data: Vec<u8>,
}

impl Source {
    pub fn new(handle: u64, name: &str) -> Self {
        Self {
            handle,
            name: name.to_string(),
            unit: "mm/s".to_string(),
            device_name: "VSE100".to_string(),
            ..Self::default()
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; SOURCE_LEN];
        put_u64(&mut buf, 0, self.handle);
        put_u64(&mut buf, 8, self.parent);
        put_text(&mut buf, 316, 256, &self.name);
        put_text(&mut buf, 828, 256, &self.unit);
        put_f32s(&mut buf, 1084, &self.parameters);
        put_text(&mut buf, 1116, 256, &self.device_name);
        put_u32(&mut buf, 1888, self.dev_size);
        buf[1892..1892 + self.dev_data.len()].copy_from_slice(&self.dev_data);
        buf
    }
}

/// Raw sample block contents.
#[derive(Debug, Clone, Default)]
pub struct Stream {
    pub handle: u64,
    pub timestamp: u64,
    pub value_count: u32,
    pub divider: u32,
    /// Samples written starting at `first_slot`
    pub samples: Vec<f32>,
    pub first_slot: usize,
}

impl Stream {
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; STREAM_LEN];
        put_u64(&mut buf, 0, self.handle);
        put_u64(&mut buf, 16, self.timestamp);
        put_u32(&mut buf, 24, self.value_count);
        put_u32(&mut buf, 28, self.divider);
        put_f32s(&mut buf, 36 + self.first_slot * 4, &self.samples);
        buf
    }
}

/// A whole capture.
#[derive(Debug, Clone, Default)]
pub struct Capture {
    pub primary: Primary,
    pub secondary: Secondary,
    pub sources: Vec<Source>,
    pub stream: Option<Stream>,
}

impl Capture {
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = self.primary.encode();
        buf.extend(self.secondary.encode());
        for source in &self.sources {
            buf.extend(source.encode());
        }
        if let Some(stream) = &self.stream {
            buf.extend(stream.encode());
        }
        buf
    }
}

//! Low-level field extraction from VSE004 byte blocks.
//!
//! Every field in the format sits at a fixed offset inside its block, so the
//! readers here take the block slice plus an explicit offset. Callers are
//! expected to have checked the block length with [`ensure_len`] first; the
//! readers themselves index directly and panic on out-of-range offsets.

use byteorder::{ByteOrder, LittleEndian};

use crate::decoder::DecodeError;
use crate::types::Section;

/// UTF-16 byte-order mark as read with little-endian byte order.
const BOM_LE: u16 = 0xFEFF;
/// A big-endian byte-order mark seen through a little-endian read.
const BOM_BE_SWAPPED: u16 = 0xFFFE;

/// Fails with a size error unless `data` holds at least `expected` bytes.
#[inline]
pub fn ensure_len(section: Section, data: &[u8], expected: usize) -> Result<(), DecodeError> {
    if data.len() < expected {
        return Err(DecodeError::Size {
            section,
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

// ============================================================================
// Numeric fields (little-endian)
// ============================================================================

/// Reads an unsigned 32-bit integer at `offset`.
#[inline]
pub fn read_u32(data: &[u8], offset: usize) -> u32 {
    LittleEndian::read_u32(&data[offset..offset + 4])
}

/// Reads an unsigned 64-bit integer at `offset`.
#[inline]
pub fn read_u64(data: &[u8], offset: usize) -> u64 {
    LittleEndian::read_u64(&data[offset..offset + 8])
}

/// Reads `count` consecutive 32-bit floats starting at `offset`.
pub fn read_f32_vec(data: &[u8], offset: usize, count: usize) -> Vec<f32> {
    let mut values = vec![0f32; count];
    LittleEndian::read_f32_into(&data[offset..offset + count * 4], &mut values);
    values
}

/// Returns a fixed-width raw byte region.
#[inline]
pub fn read_bytes(data: &[u8], offset: usize, len: usize) -> &[u8] {
    &data[offset..offset + len]
}

// ============================================================================
// Fixed-width text
// ============================================================================

/// Decodes a zero-padded, fixed-width UTF-16 text field.
///
/// The whole field is decoded first and trailing NUL characters are stripped
/// afterwards. Text is little-endian unless the field opens with a big-endian
/// byte-order mark. Unpaired surrogates become U+FFFD.
pub fn read_utf16(data: &[u8], offset: usize, len: usize) -> String {
    let field = &data[offset..offset + len];
    let mut units = vec![0u16; field.len() / 2];
    LittleEndian::read_u16_into(&field[..units.len() * 2], &mut units);

    let start = match units.first().copied() {
        Some(BOM_LE) => 1,
        Some(BOM_BE_SWAPPED) => {
            units[1..].iter_mut().for_each(|u| *u = u.swap_bytes());
            1
        }
        _ => 0,
    };

    let mut text = String::from_utf16_lossy(&units[start..]);
    let trimmed = text.trim_end_matches('\0').len();
    text.truncate(trimmed);
    text
}

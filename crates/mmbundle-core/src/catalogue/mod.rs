//! Catalogue layout codec
//!
//! Pure offset arithmetic and field codecs for the 16-byte catalogue entries.
//! Nothing here validates slot numbers; callers do that first.

pub mod types;

use crate::types::{NameTail, DISK_SIZE, ENTRY_SIZE, FLAG_OFFSET, HEADER_SIZE, MAX_NAME_LENGTH};
use std::ops::Range;
use types::SlotFlags;

/// Catalogue entry layout
///
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0x00    12    Disk title (ASCII, ends at first 0x00 or space)
/// 0x0C    3     Reserved
/// 0x0F    1     Flags (see SlotFlags)
/// ```
///
/// Entry `n` lives at `16 * (n + 1)`; the first 16 bytes of the header hold
/// the boot table.
pub fn entry_offset(slot: u16) -> usize {
    ENTRY_SIZE * (slot as usize + 1)
}

/// Offset of a slot's flag byte
pub fn flag_offset(slot: u16) -> usize {
    entry_offset(slot) + FLAG_OFFSET
}

/// Offset of the first byte of a slot's disk image
pub fn data_offset(slot: u16) -> usize {
    HEADER_SIZE + DISK_SIZE * slot as usize
}

/// Byte range of a slot's disk image
pub fn data_range(slot: u16) -> Range<usize> {
    let start = data_offset(slot);
    start..start + DISK_SIZE
}

/// Read a disk title
pub fn read_name(region: &[u8], slot: u16) -> String {
    let offset = entry_offset(slot);
    let field = &region[offset..offset + MAX_NAME_LENGTH];

    let length = field
        .iter()
        .position(|&b| b == 0 || b == b' ')
        .unwrap_or(MAX_NAME_LENGTH);

    field[..length]
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
        .collect()
}

/// Write a disk title
///
/// Only the part of `name` before its first space is stored, clipped to
/// [`MAX_NAME_LENGTH`] bytes. Non-ASCII characters are stored as `?`.
pub fn write_name(region: &mut [u8], slot: u16, name: &str, tail: NameTail) {
    let offset = entry_offset(slot);
    let word = name.split(' ').next().unwrap_or_default();

    let encoded: Vec<u8> = word
        .chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .take(MAX_NAME_LENGTH)
        .collect();

    let field = &mut region[offset..offset + MAX_NAME_LENGTH];
    field[..encoded.len()].copy_from_slice(&encoded);

    if tail == NameTail::ZeroFill {
        field[encoded.len()..].fill(0);
    }
}

/// Read a slot's flag byte
pub fn read_flags(region: &[u8], slot: u16) -> SlotFlags {
    SlotFlags::from_byte(region[flag_offset(slot)])
}

/// Overwrite a slot's flag byte
pub fn write_flags(region: &mut [u8], slot: u16, flags: SlotFlags) {
    region[flag_offset(slot)] = flags.to_byte();
}

/// OR a nibble mask into a slot's flag byte
pub fn set_flag(region: &mut [u8], slot: u16, mask: u8) {
    let flags = read_flags(region, slot).set(mask);
    write_flags(region, slot, flags);
}

/// Clear a nibble mask from a slot's flag byte
pub fn clear_flag(region: &mut [u8], slot: u16, mask: u8) {
    let flags = read_flags(region, slot).clear(mask);
    write_flags(region, slot, flags);
}

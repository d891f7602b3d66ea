//! Boot table codec
//!
//! The first eight header bytes map each of the four drives to the slot it
//! loads at power on. The slot number is split across two bytes that are
//! *not* adjacent:
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  -----
//! 0x00    4     Low byte of boot slot, drives 0-3
//! 0x04    4     High byte of boot slot, drives 0-3
//! 0x08    8     Reserved
//! ```

use crate::types::DRIVE_COUNT;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Offset of the high bytes relative to the low bytes
const HIGH_BYTE_OFFSET: usize = 4;

/// Read the boot slot for a drive (drive must already be validated)
pub fn read_boot_slot(region: &[u8], drive: u8) -> u16 {
    let lo = region[drive as usize] as u16;
    let hi = region[drive as usize + HIGH_BYTE_OFFSET] as u16;
    (hi << 8) | lo
}

/// Write the boot slot for a drive (both arguments must already be validated)
pub fn write_boot_slot(region: &mut [u8], drive: u8, slot: u16) {
    region[drive as usize] = (slot & 0xFF) as u8;
    region[drive as usize + HIGH_BYTE_OFFSET] = ((slot >> 8) & 0xFF) as u8;
}

/// Snapshot of all four boot drive assignments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BootTable {
    pub drives: [u16; DRIVE_COUNT as usize],
}

impl BootTable {
    /// Decode the table from the start of a bundle header
    pub fn read(region: &[u8]) -> Self {
        let mut drives = [0u16; DRIVE_COUNT as usize];
        for (drive, slot) in drives.iter_mut().enumerate() {
            *slot = read_boot_slot(region, drive as u8);
        }
        Self { drives }
    }

    /// Boot slot for a drive, if the drive exists
    pub fn get(&self, drive: u8) -> Option<u16> {
        self.drives.get(drive as usize).copied()
    }
}

impl fmt::Display for BootTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (drive, slot) in self.drives.iter().enumerate() {
            if drive > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}:{}", drive, slot)?;
        }
        Ok(())
    }
}

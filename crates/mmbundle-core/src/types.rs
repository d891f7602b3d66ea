//! Geometry constants, configuration and summary types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes per DFS sector
pub const SECTOR_SIZE: usize = 256;

/// Sectors on each track
pub const SECTORS_PER_TRACK: usize = 10;

/// Tracks on one side of a disk
pub const TRACKS_PER_DISK: usize = 80;

/// Total bytes in a single disk image
pub const DISK_SIZE: usize = SECTOR_SIZE * SECTORS_PER_TRACK * TRACKS_PER_DISK;

/// Sectors reserved at the start of the bundle for the header and catalogue
pub const HEADER_SECTORS: usize = 32;

/// Offset of the first disk image
pub const HEADER_SIZE: usize = SECTOR_SIZE * HEADER_SECTORS;

/// Size of one catalogue entry
pub const ENTRY_SIZE: usize = 16;

/// Offset of the flag byte inside a catalogue entry
pub const FLAG_OFFSET: usize = 15;

/// Longest disk title a catalogue entry can hold
pub const MAX_NAME_LENGTH: usize = 12;

/// Number of addressable slots (0 - 510)
pub const SLOT_COUNT: u16 = 511;

/// Highest valid slot index
pub const MAX_SLOT: u16 = SLOT_COUNT - 1;

/// Number of boot drives (0 - 3)
pub const DRIVE_COUNT: u8 = 4;

/// Byte length of a bundle with `slots` disk images allocated
pub const fn bundle_length(slots: u16) -> usize {
    HEADER_SIZE + DISK_SIZE * slots as usize
}

/// What happens to catalogue name bytes past the end of a shorter new name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameTail {
    /// Leave old bytes in place (matches older MMB tools)
    Preserve,
    /// Clear the unused part of the name field
    #[default]
    ZeroFill,
}

/// What happens to slot bytes past the end of a short inserted image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageTail {
    /// Leave the previous disk contents in place
    Preserve,
    /// Clear the remainder of the slot
    #[default]
    ZeroFill,
}

/// Behaviour switches for a bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Handling of stale name bytes on rename
    pub name_tail: NameTail,

    /// Handling of the slot remainder when inserting a short image
    pub image_tail: ImageTail,

    /// Mark an unoccupied slot active when a disk is inserted into it
    pub activate_on_insert: bool,
}

impl BundleConfig {
    /// Byte-for-byte behaviour of older MMB tooling
    pub fn legacy() -> Self {
        Self {
            name_tail: NameTail::Preserve,
            image_tail: ImageTail::Preserve,
            activate_on_insert: false,
        }
    }
}

/// Summary of one catalogue slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInfo {
    /// Slot index
    pub slot: u16,

    /// Disk title from the catalogue
    pub name: String,

    /// Slot holds an active disk
    pub occupied: bool,

    /// Slot is write protected (only meaningful when occupied)
    pub locked: bool,

    /// Slot has a data region in the bundle
    pub has_storage: bool,
}

impl fmt::Display for SlotInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match (self.occupied, self.locked) {
            (false, _) => "-",
            (true, true) => "L",
            (true, false) => "U",
        };
        write!(f, "{:>3} {} {}", self.slot, state, self.name)
    }
}

//! Catalogue flag byte

use std::fmt;

/// Flag byte of a catalogue entry
///
/// Two independent nibbles, each either all ones or all zeros:
///
/// ```text
/// Bits  All ones (0xF)          All zeros (0x0)
/// ----  ----------------------  ---------------
/// 4-7   unformatted / inactive  active
/// 0-3   writable (unlocked)     locked
/// ```
///
/// Any other nibble value reads as "not all ones"; only the two patterns
/// above are ever written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotFlags(u8);

impl SlotFlags {
    /// High nibble: disk is unformatted
    pub const UNFORMATTED: u8 = 0xF0;

    /// Low nibble: disk is writable
    pub const WRITABLE: u8 = 0x0F;

    /// Flags of a slot that holds nothing
    pub const EMPTY: SlotFlags = SlotFlags(Self::UNFORMATTED);

    /// Wrap a raw flag byte
    pub const fn from_byte(b: u8) -> Self {
        Self(b)
    }

    /// Raw flag byte
    pub const fn to_byte(self) -> u8 {
        self.0
    }

    /// Slot holds an active disk
    pub fn is_occupied(self) -> bool {
        self.0 & Self::UNFORMATTED != Self::UNFORMATTED
    }

    /// Slot is write protected
    pub fn is_locked(self) -> bool {
        self.0 & Self::WRITABLE != Self::WRITABLE
    }

    /// OR in a nibble mask
    pub fn set(self, mask: u8) -> Self {
        Self(self.0 | mask)
    }

    /// Clear a nibble mask
    pub fn clear(self, mask: u8) -> Self {
        Self(self.0 & !mask)
    }
}

impl Default for SlotFlags {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for SlotFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

//! Bundle error types

use thiserror::Error;

/// Errors raised by bundle operations
///
/// Every variant is a validation failure detected before the bundle is
/// touched, so a failed call never leaves a partial write behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Slot index (or storage size) outside the accepted range
    #[error("Invalid slot: {0}")]
    InvalidSlot(u16),

    /// Drive number outside 0-3
    #[error("Invalid drive: {0}")]
    InvalidDrive(u8),

    /// Operation needs an occupied slot but the slot is unformatted
    #[error("Slot {0} is not active")]
    InactiveSlot(u16),

    /// Slot has no storage allocated in the bundle
    #[error("Slot {0} has no storage allocated")]
    NoStorageSlot(u16),

    /// Slot is write protected
    #[error("Slot {0} is locked")]
    LockedSlot(u16),

    /// Shrinking the bundle would drop an occupied slot
    #[error("Resize would truncate occupied slot {slot}")]
    ResizeWouldTruncate { slot: u16 },

    /// Byte sequence is not a whole header plus whole disk images
    #[error("Malformed bundle: length {length} is not a header plus up to 511 disk images")]
    MalformedBundle { length: usize },
}

/// Result type alias for bundle operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The slot an error refers to, if any
    pub fn slot(&self) -> Option<u16> {
        match self {
            Error::InvalidSlot(slot)
            | Error::InactiveSlot(slot)
            | Error::NoStorageSlot(slot)
            | Error::LockedSlot(slot)
            | Error::ResizeWouldTruncate { slot } => Some(*slot),
            Error::InvalidDrive(_) | Error::MalformedBundle { .. } => None,
        }
    }

    /// True for errors caused by the state of a slot rather than a bad argument
    pub fn is_slot_state(&self) -> bool {
        matches!(
            self,
            Error::InactiveSlot(_)
                | Error::NoStorageSlot(_)
                | Error::LockedSlot(_)
                | Error::ResizeWouldTruncate { .. }
        )
    }
}

//! # MMB Bundle Core
//!
//! Catalogue engine for MMB bundles: a flat container holding up to 511
//! single-sided 80 track DFS disk images behind an 8 KiB header.
//!
//! This crate only ever works on in-memory byte sequences:
//! - **Disk**: a fixed-size raw disk image value
//! - **Catalogue**: byte layout of the 16-byte slot entries and their flags
//! - **Boot**: the drive to slot table at the start of the header
//! - **Bundle**: slot lifecycle, insert/extract and storage resizing
//!
//! Reading and writing bundle files is left to the caller.
//!
//! ## Example
//!
//! ```rust
//! use mmbundle_core::{Bundle, DiskImage, Result};
//!
//! fn build() -> Result<Vec<u8>> {
//!     let mut bundle = Bundle::with_slots(2)?;
//!     bundle.insert(0, DiskImage::blank())?;
//!     bundle.activate(0)?;
//!     bundle.set_name(0, "GAMES")?;
//!     bundle.set_boot_slot(0, 0)?;
//!     Ok(bundle.into_bytes())
//! }
//!
//! let bytes = build().unwrap();
//! assert_eq!(bytes.len(), mmbundle_core::HEADER_SIZE + 2 * mmbundle_core::DISK_SIZE);
//! ```

pub mod boot;
pub mod bundle;
pub mod catalogue;
pub mod disk;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use boot::BootTable;
pub use bundle::Bundle;
pub use catalogue::types::SlotFlags;
pub use disk::DiskImage;
pub use error::{Error, Result};
pub use types::*;

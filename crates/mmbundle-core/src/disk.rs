//! Fixed-size disk image value

use crate::types::DISK_SIZE;

/// Raw image of one single-sided 80 track DFS disk
///
/// Always exactly [`DISK_SIZE`] bytes. Once built the contents never change;
/// extracting a disk from a bundle produces an independent copy.
#[derive(Clone, PartialEq, Eq)]
pub struct DiskImage {
    bytes: Box<[u8]>,
}

impl DiskImage {
    /// Manufacture a blank, zero-filled disk
    pub fn blank() -> Self {
        Self {
            bytes: vec![0u8; DISK_SIZE].into_boxed_slice(),
        }
    }

    /// Build a disk from raw bytes
    ///
    /// Short input is padded with zeros; anything past [`DISK_SIZE`] is dropped.
    pub fn from_bytes(source: &[u8]) -> Self {
        if source.len() > DISK_SIZE {
            tracing::warn!(
                "Disk image of {} bytes truncated to {} bytes",
                source.len(),
                DISK_SIZE
            );
        }

        let mut bytes = vec![0u8; DISK_SIZE];
        let count = source.len().min(DISK_SIZE);
        bytes[..count].copy_from_slice(&source[..count]);

        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }

    /// Raw image bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take ownership of the raw image bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes.into_vec()
    }

    /// Image length in bytes (always [`DISK_SIZE`])
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Never true; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Default for DiskImage {
    fn default() -> Self {
        Self::blank()
    }
}

impl AsRef<[u8]> for DiskImage {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<&[u8]> for DiskImage {
    fn from(source: &[u8]) -> Self {
        Self::from_bytes(source)
    }
}

impl std::fmt::Debug for DiskImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskImage")
            .field("len", &self.bytes.len())
            .finish()
    }
}

//! MMB bundle: slot lifecycle, insert/extract and storage resizing

use crate::boot::{self, BootTable};
use crate::catalogue::{self, types::SlotFlags};
use crate::disk::DiskImage;
use crate::error::{Error, Result};
use crate::types::{
    bundle_length, BundleConfig, ImageTail, SlotInfo, DISK_SIZE, DRIVE_COUNT, HEADER_SIZE,
    MAX_SLOT, SLOT_COUNT,
};

/// An MMB bundle held in memory
///
/// # Structure
///
/// ```text
/// Offset              Size          Field
/// ------              ----          -----
/// 0x0000              8             Boot table (see boot module)
/// 0x0008              8             Reserved
/// 0x0010              16 * 511      Catalogue entries, slots 0-510
/// 0x2000              204800 * N    Disk images for slots 0..N
/// ```
///
/// The byte region is the only state. Its length is always
/// `HEADER_SIZE + DISK_SIZE * storage_size()`, and resizing replaces it with
/// a freshly allocated region rather than growing it in place.
///
/// A bundle has a single owner; every mutation takes `&mut self`.
#[derive(Clone)]
pub struct Bundle {
    region: Vec<u8>,
    config: BundleConfig,
}

impl Bundle {
    /// Create a bundle with no disk storage allocated
    pub fn new() -> Self {
        Self::build(0, BundleConfig::default())
    }

    /// Create a bundle with storage for `slots` disks (0 - 511)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSlot`] if `slots` is above 511
    pub fn with_slots(slots: u16) -> Result<Self> {
        Self::with_config(slots, BundleConfig::default())
    }

    /// Create a bundle with storage for `slots` disks and explicit behaviour
    pub fn with_config(slots: u16, config: BundleConfig) -> Result<Self> {
        if slots > SLOT_COUNT {
            return Err(Error::InvalidSlot(slots));
        }

        Ok(Self::build(slots, config))
    }

    fn build(slots: u16, config: BundleConfig) -> Self {
        let mut region = vec![0u8; bundle_length(slots)];

        for slot in 0..SLOT_COUNT {
            catalogue::set_flag(&mut region, slot, SlotFlags::UNFORMATTED);
        }

        Self { region, config }
    }

    /// Adopt an existing bundle image verbatim
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedBundle`] unless the length is a full header
    /// followed by a whole number of disk images (at most 511).
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with_config(bytes, BundleConfig::default())
    }

    /// Adopt an existing bundle image with explicit behaviour
    pub fn from_bytes_with_config(bytes: Vec<u8>, config: BundleConfig) -> Result<Self> {
        let length = bytes.len();

        let valid = length >= HEADER_SIZE
            && (length - HEADER_SIZE) % DISK_SIZE == 0
            && (length - HEADER_SIZE) / DISK_SIZE <= SLOT_COUNT as usize;

        if !valid {
            return Err(Error::MalformedBundle { length });
        }

        Ok(Self {
            region: bytes,
            config,
        })
    }

    /// Current bundle bytes, ready to be saved
    pub fn as_bytes(&self) -> &[u8] {
        &self.region
    }

    /// Take ownership of the bundle bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.region
    }

    /// Behaviour switches in effect
    pub fn config(&self) -> &BundleConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Boot table
    // ------------------------------------------------------------------

    /// Set the slot loaded into `drive` at power on
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDrive`] if `drive` is not 0-3
    /// - [`Error::InvalidSlot`] if `slot` is not 0-510
    pub fn set_boot_slot(&mut self, drive: u8, slot: u16) -> Result<()> {
        check_drive(drive)?;
        check_slot(slot)?;

        boot::write_boot_slot(&mut self.region, drive, slot);
        tracing::debug!("Boot drive {} set to slot {}", drive, slot);
        Ok(())
    }

    /// Slot loaded into `drive` at power on
    pub fn boot_slot(&self, drive: u8) -> Result<u16> {
        check_drive(drive)?;
        Ok(boot::read_boot_slot(&self.region, drive))
    }

    /// All four boot assignments
    pub fn boot_table(&self) -> BootTable {
        BootTable::read(&self.region)
    }

    // ------------------------------------------------------------------
    // Catalogue
    // ------------------------------------------------------------------

    /// Disk title of a slot
    pub fn name(&self, slot: u16) -> Result<String> {
        check_slot(slot)?;
        Ok(catalogue::read_name(&self.region, slot))
    }

    /// Change the disk title of a slot
    ///
    /// Only the first word of `name` is kept, clipped to 12 characters.
    pub fn set_name(&mut self, slot: u16, name: &str) -> Result<()> {
        check_slot(slot)?;

        catalogue::write_name(&mut self.region, slot, name, self.config.name_tail);
        tracing::debug!("Slot {} renamed to {:?}", slot, catalogue::read_name(&self.region, slot));
        Ok(())
    }

    /// Raw flag byte of a slot
    pub fn flags(&self, slot: u16) -> Result<SlotFlags> {
        check_slot(slot)?;
        Ok(catalogue::read_flags(&self.region, slot))
    }

    /// Summary of a single slot
    pub fn slot_info(&self, slot: u16) -> Result<SlotInfo> {
        check_slot(slot)?;

        let flags = catalogue::read_flags(&self.region, slot);
        Ok(SlotInfo {
            slot,
            name: catalogue::read_name(&self.region, slot),
            occupied: flags.is_occupied(),
            locked: flags.is_occupied() && flags.is_locked(),
            has_storage: slot < self.storage_size(),
        })
    }

    /// Summaries of every slot with storage allocated
    pub fn catalogue(&self) -> Vec<SlotInfo> {
        (0..self.storage_size())
            .filter_map(|slot| self.slot_info(slot).ok())
            .collect()
    }

    /// First occupied slot whose title matches `name`
    pub fn find_slot(&self, name: &str) -> Option<u16> {
        (0..self.storage_size()).find(|&slot| {
            catalogue::read_flags(&self.region, slot).is_occupied()
                && catalogue::read_name(&self.region, slot) == name
        })
    }

    /// Lowest slot with storage that does not hold an active disk
    pub fn first_free_slot(&self) -> Option<u16> {
        (0..self.storage_size()).find(|&slot| !catalogue::read_flags(&self.region, slot).is_occupied())
    }

    // ------------------------------------------------------------------
    // Slot lifecycle
    // ------------------------------------------------------------------

    /// Check if a slot holds an active disk
    pub fn is_occupied(&self, slot: u16) -> Result<bool> {
        check_slot(slot)?;
        Ok(catalogue::read_flags(&self.region, slot).is_occupied())
    }

    /// Mark a slot as holding an active disk
    ///
    /// Only the unformatted nibble is cleared; a freshly allocated slot ends
    /// up active and locked (flag byte `0x00`). Activating a slot whose data
    /// was never written gives a disk that still needs formatting.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSlot`] if `slot` is not 0-510
    /// - [`Error::NoStorageSlot`] if the slot has no storage allocated
    pub fn activate(&mut self, slot: u16) -> Result<()> {
        check_slot(slot)?;
        self.check_storage(slot)?;

        catalogue::clear_flag(&mut self.region, slot, SlotFlags::UNFORMATTED);
        tracing::debug!("Slot {} activated", slot);
        Ok(())
    }

    /// Remove a slot from the catalogue, optionally zeroing its disk image
    ///
    /// The flag byte ends up `0xF0` (unformatted, locked nibble cleared).
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSlot`] if `slot` is not 0-510
    /// - [`Error::LockedSlot`] if the slot is occupied and locked
    /// - [`Error::NoStorageSlot`] if `wipe` is set and the slot has no storage
    pub fn deactivate(&mut self, slot: u16, wipe: bool) -> Result<()> {
        check_slot(slot)?;

        let flags = catalogue::read_flags(&self.region, slot);
        if flags.is_occupied() && flags.is_locked() {
            return Err(Error::LockedSlot(slot));
        }

        if wipe {
            self.check_storage(slot)?;
        }

        catalogue::write_flags(
            &mut self.region,
            slot,
            flags.clear(SlotFlags::WRITABLE).set(SlotFlags::UNFORMATTED),
        );

        if wipe {
            self.region[catalogue::data_range(slot)].fill(0);
        }

        tracing::debug!("Slot {} deactivated (wipe: {})", slot, wipe);
        Ok(())
    }

    /// Check if an active slot is write protected
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSlot`] if `slot` is not 0-510
    /// - [`Error::InactiveSlot`] if the slot is not active
    pub fn is_locked(&self, slot: u16) -> Result<bool> {
        check_slot(slot)?;
        self.check_occupied(slot)?;

        Ok(catalogue::read_flags(&self.region, slot).is_locked())
    }

    /// Write protect an active slot
    pub fn lock(&mut self, slot: u16) -> Result<()> {
        check_slot(slot)?;
        self.check_occupied(slot)?;

        catalogue::clear_flag(&mut self.region, slot, SlotFlags::WRITABLE);
        tracing::debug!("Slot {} locked", slot);
        Ok(())
    }

    /// Allow writes to an active slot
    pub fn unlock(&mut self, slot: u16) -> Result<()> {
        check_slot(slot)?;
        self.check_occupied(slot)?;

        catalogue::set_flag(&mut self.region, slot, SlotFlags::WRITABLE);
        tracing::debug!("Slot {} unlocked", slot);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Insert / extract
    // ------------------------------------------------------------------

    /// Copy the disk image out of an active slot
    ///
    /// The bundle is left unchanged.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSlot`] if `slot` is not 0-510
    /// - [`Error::InactiveSlot`] if the slot is not active
    /// - [`Error::NoStorageSlot`] if the slot has no storage allocated
    pub fn extract(&self, slot: u16) -> Result<DiskImage> {
        check_slot(slot)?;
        self.check_occupied(slot)?;
        self.check_storage(slot)?;

        Ok(DiskImage::from_bytes(&self.region[catalogue::data_range(slot)]))
    }

    /// Write a disk image into a slot
    ///
    /// Up to [`DISK_SIZE`] bytes of `disk` are copied to the start of the
    /// slot. For shorter input the rest of the slot is zeroed or kept
    /// according to [`BundleConfig::image_tail`]. The slot is only marked
    /// active when [`BundleConfig::activate_on_insert`] is set.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSlot`] if `slot` is not 0-510
    /// - [`Error::LockedSlot`] if the slot is occupied and locked
    /// - [`Error::NoStorageSlot`] if the slot has no storage allocated
    pub fn insert<D: AsRef<[u8]>>(&mut self, slot: u16, disk: D) -> Result<()> {
        check_slot(slot)?;

        let flags = catalogue::read_flags(&self.region, slot);
        if flags.is_occupied() && flags.is_locked() {
            return Err(Error::LockedSlot(slot));
        }

        self.check_storage(slot)?;

        let source = disk.as_ref();
        let count = source.len().min(DISK_SIZE);
        let target = &mut self.region[catalogue::data_range(slot)];

        target[..count].copy_from_slice(&source[..count]);

        if self.config.image_tail == ImageTail::ZeroFill {
            target[count..].fill(0);
        }

        if self.config.activate_on_insert && !flags.is_occupied() {
            catalogue::clear_flag(&mut self.region, slot, SlotFlags::UNFORMATTED);
        }

        tracing::debug!("Inserted {} bytes into slot {}", count, slot);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Storage
    // ------------------------------------------------------------------

    /// Number of slots with disk storage allocated
    pub fn storage_size(&self) -> u16 {
        ((self.region.len() - HEADER_SIZE) / DISK_SIZE) as u16
    }

    /// Grow or shrink disk storage to `slots` disks (0 - 511)
    ///
    /// Resizing to the current size does nothing and keeps the existing
    /// allocation. Otherwise the region is rebuilt: the common prefix is
    /// copied and any new slots are zero-filled.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSlot`] if `slots` is above 511
    /// - [`Error::ResizeWouldTruncate`] with the lowest occupied slot that
    ///   would lose its storage
    pub fn change_storage_size(&mut self, slots: u16) -> Result<()> {
        if slots > SLOT_COUNT {
            return Err(Error::InvalidSlot(slots));
        }

        let current = self.storage_size();

        if let Some(slot) = (slots..current)
            .find(|&slot| catalogue::read_flags(&self.region, slot).is_occupied())
        {
            return Err(Error::ResizeWouldTruncate { slot });
        }

        if slots == current {
            return Ok(());
        }

        let mut region = vec![0u8; bundle_length(slots)];
        let common = region.len().min(self.region.len());
        region[..common].copy_from_slice(&self.region[..common]);

        self.region = region;
        tracing::debug!("Bundle storage resized from {} to {} slots", current, slots);
        Ok(())
    }

    fn check_occupied(&self, slot: u16) -> Result<()> {
        if !catalogue::read_flags(&self.region, slot).is_occupied() {
            return Err(Error::InactiveSlot(slot));
        }
        Ok(())
    }

    fn check_storage(&self, slot: u16) -> Result<()> {
        if slot >= self.storage_size() {
            return Err(Error::NoStorageSlot(slot));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Bundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundle")
            .field("storage_size", &self.storage_size())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for Bundle {
    fn default() -> Self {
        Self::new()
    }
}

fn check_slot(slot: u16) -> Result<()> {
    if slot > MAX_SLOT {
        return Err(Error::InvalidSlot(slot));
    }
    Ok(())
}

fn check_drive(drive: u8) -> Result<()> {
    if drive >= DRIVE_COUNT {
        return Err(Error::InvalidDrive(drive));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::flag_offset;

    fn flag_byte(bundle: &Bundle, slot: u16) -> u8 {
        bundle.as_bytes()[flag_offset(slot)]
    }

    #[test]
    fn test_new_bundle_is_header_only() {
        let bundle = Bundle::new();
        assert_eq!(bundle.storage_size(), 0);
        assert_eq!(bundle.as_bytes().len(), HEADER_SIZE);
    }

    #[test]
    fn test_new_bundle_all_slots_unformatted() {
        let bundle = Bundle::new();
        for slot in 0..SLOT_COUNT {
            assert_eq!(flag_byte(&bundle, slot), 0xF0, "slot {}", slot);
            assert!(!bundle.is_occupied(slot).unwrap());
        }
    }

    #[test]
    fn test_new_bundle_boot_slots_zero() {
        let bundle = Bundle::new();
        assert!(bundle.as_bytes()[..8].iter().all(|&b| b == 0));
        for drive in 0..DRIVE_COUNT {
            assert_eq!(bundle.boot_slot(drive).unwrap(), 0);
        }
    }

    #[test]
    fn test_with_slots_limits() {
        assert_eq!(Bundle::with_slots(511).unwrap().storage_size(), 511);
        assert_eq!(Bundle::with_slots(512).unwrap_err(), Error::InvalidSlot(512));
    }

    #[test]
    fn test_from_bytes_validates_length() {
        assert!(Bundle::from_bytes(vec![0u8; HEADER_SIZE]).is_ok());
        assert!(Bundle::from_bytes(vec![0u8; HEADER_SIZE + DISK_SIZE]).is_ok());

        let err = Bundle::from_bytes(vec![0u8; HEADER_SIZE - 1]).unwrap_err();
        assert_eq!(err, Error::MalformedBundle { length: HEADER_SIZE - 1 });

        let err = Bundle::from_bytes(vec![0u8; HEADER_SIZE + 100]).unwrap_err();
        assert!(matches!(err, Error::MalformedBundle { .. }));
    }

    #[test]
    fn test_from_bytes_is_verbatim() {
        let original = Bundle::with_slots(1).unwrap().into_bytes();
        let bundle = Bundle::from_bytes(original.clone()).unwrap();
        assert_eq!(bundle.as_bytes(), &original[..]);
        assert_eq!(bundle.storage_size(), 1);
    }

    #[test]
    fn test_boot_slot_validation() {
        let mut bundle = Bundle::new();
        assert_eq!(bundle.boot_slot(4).unwrap_err(), Error::InvalidDrive(4));
        assert_eq!(bundle.set_boot_slot(4, 0).unwrap_err(), Error::InvalidDrive(4));
        assert_eq!(bundle.set_boot_slot(0, 511).unwrap_err(), Error::InvalidSlot(511));
    }

    #[test]
    fn test_boot_slot_drive_checked_before_slot() {
        let mut bundle = Bundle::new();
        assert_eq!(bundle.set_boot_slot(9, 999).unwrap_err(), Error::InvalidDrive(9));
    }

    #[test]
    fn test_set_boot_slot() {
        let mut bundle = Bundle::new();
        bundle.set_boot_slot(2, 500).unwrap();
        assert_eq!(bundle.boot_slot(2).unwrap(), 500);
        assert_eq!(bundle.boot_table().drives, [0, 0, 500, 0]);
    }

    #[test]
    fn test_activate() {
        let mut bundle = Bundle::with_slots(1).unwrap();
        bundle.activate(0).unwrap();
        assert_eq!(flag_byte(&bundle, 0), 0x00);
        assert!(bundle.is_occupied(0).unwrap());
    }

    #[test]
    fn test_activate_errors() {
        let mut bundle = Bundle::with_slots(1).unwrap();
        assert_eq!(bundle.activate(511).unwrap_err(), Error::InvalidSlot(511));
        assert_eq!(bundle.activate(1).unwrap_err(), Error::NoStorageSlot(1));
        assert_eq!(flag_byte(&bundle, 1), 0xF0);
    }

    #[test]
    fn test_lock_cycle() {
        let mut bundle = Bundle::with_slots(1).unwrap();
        bundle.activate(0).unwrap();
        assert!(bundle.is_locked(0).unwrap());

        bundle.unlock(0).unwrap();
        assert_eq!(flag_byte(&bundle, 0), 0x0F);
        assert!(!bundle.is_locked(0).unwrap());

        bundle.lock(0).unwrap();
        assert_eq!(flag_byte(&bundle, 0), 0x00);
        assert!(bundle.is_locked(0).unwrap());
    }

    #[test]
    fn test_lock_requires_active_slot() {
        let mut bundle = Bundle::with_slots(1).unwrap();
        assert_eq!(bundle.lock(1).unwrap_err(), Error::InactiveSlot(1));
        assert_eq!(bundle.unlock(1).unwrap_err(), Error::InactiveSlot(1));
        assert_eq!(bundle.is_locked(1).unwrap_err(), Error::InactiveSlot(1));
        assert_eq!(bundle.lock(511).unwrap_err(), Error::InvalidSlot(511));
    }

    #[test]
    fn test_deactivate_locked_slot() {
        let mut bundle = Bundle::with_slots(1).unwrap();
        bundle.activate(0).unwrap();
        assert_eq!(bundle.deactivate(0, false).unwrap_err(), Error::LockedSlot(0));
        assert_eq!(flag_byte(&bundle, 0), 0x00);
    }

    #[test]
    fn test_deactivate_restores_empty_flags() {
        let mut bundle = Bundle::with_slots(1).unwrap();
        bundle.activate(0).unwrap();
        bundle.unlock(0).unwrap();
        bundle.deactivate(0, false).unwrap();
        assert_eq!(flag_byte(&bundle, 0), 0xF0);
        assert!(!bundle.is_occupied(0).unwrap());
    }

    #[test]
    fn test_deactivate_inactive_slot() {
        let mut bundle = Bundle::with_slots(1).unwrap();
        bundle.deactivate(0, false).unwrap();
        assert_eq!(flag_byte(&bundle, 0), 0xF0);
    }

    #[test]
    fn test_deactivate_wipe_without_storage() {
        let mut bundle = Bundle::with_slots(1).unwrap();
        assert_eq!(bundle.deactivate(3, true).unwrap_err(), Error::NoStorageSlot(3));
        assert_eq!(flag_byte(&bundle, 3), 0xF0);
    }

    #[test]
    fn test_insert_and_extract() {
        let mut bundle = Bundle::with_slots(2).unwrap();
        let source: Vec<u8> = (0u8..=255).cycle().take(DISK_SIZE).collect();

        bundle.insert(1, &source).unwrap();
        bundle.activate(1).unwrap();

        let disk = bundle.extract(1).unwrap();
        assert_eq!(disk.as_bytes(), &source[..]);
        assert!(bundle.as_bytes()[catalogue::data_range(0)].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_insert_does_not_activate_by_default() {
        let mut bundle = Bundle::with_slots(1).unwrap();
        bundle.insert(0, DiskImage::blank()).unwrap();
        assert!(!bundle.is_occupied(0).unwrap());
    }

    #[test]
    fn test_insert_activates_when_configured() {
        let config = BundleConfig {
            activate_on_insert: true,
            ..BundleConfig::default()
        };
        let mut bundle = Bundle::with_config(1, config).unwrap();
        bundle.insert(0, DiskImage::blank()).unwrap();
        assert!(bundle.is_occupied(0).unwrap());
        assert_eq!(flag_byte(&bundle, 0), 0x00);
    }

    #[test]
    fn test_insert_activate_keeps_unlocked_slot_unlocked() {
        let config = BundleConfig {
            activate_on_insert: true,
            ..BundleConfig::default()
        };
        let mut bundle = Bundle::with_config(1, config).unwrap();
        bundle.activate(0).unwrap();
        bundle.unlock(0).unwrap();
        bundle.insert(0, [1u8; 4]).unwrap();
        assert_eq!(flag_byte(&bundle, 0), 0x0F);
    }

    #[test]
    fn test_insert_short_image_zero_fills() {
        let mut bundle = Bundle::with_slots(1).unwrap();
        bundle.insert(0, vec![0xAA; DISK_SIZE]).unwrap();
        bundle.insert(0, [0x55u8; 10]).unwrap();

        let data = &bundle.as_bytes()[catalogue::data_range(0)];
        assert!(data[..10].iter().all(|&b| b == 0x55));
        assert!(data[10..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_insert_short_image_legacy_preserves() {
        let mut bundle = Bundle::with_config(1, BundleConfig::legacy()).unwrap();
        bundle.insert(0, vec![0xAA; DISK_SIZE]).unwrap();
        bundle.insert(0, [0x55u8; 10]).unwrap();

        let data = &bundle.as_bytes()[catalogue::data_range(0)];
        assert!(data[..10].iter().all(|&b| b == 0x55));
        assert!(data[10..].iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_insert_oversized_image_is_clipped() {
        let mut bundle = Bundle::with_slots(2).unwrap();
        bundle.insert(0, vec![0x11; DISK_SIZE + 50]).unwrap();
        assert!(bundle.as_bytes()[catalogue::data_range(1)].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_insert_errors() {
        let mut bundle = Bundle::with_slots(1).unwrap();
        assert_eq!(bundle.insert(511, DiskImage::blank()).unwrap_err(), Error::InvalidSlot(511));
        assert_eq!(bundle.insert(1, DiskImage::blank()).unwrap_err(), Error::NoStorageSlot(1));

        bundle.activate(0).unwrap();
        assert_eq!(bundle.insert(0, [1u8; 4]).unwrap_err(), Error::LockedSlot(0));
        assert!(bundle.as_bytes()[catalogue::data_range(0)].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_extract_errors() {
        let mut bundle = Bundle::with_slots(1).unwrap();
        assert_eq!(bundle.extract(0).unwrap_err(), Error::InactiveSlot(0));
        assert_eq!(bundle.extract(511).unwrap_err(), Error::InvalidSlot(511));

        // Occupied according to the catalogue but beyond storage
        catalogue::write_flags(&mut bundle.region, 5, SlotFlags::from_byte(0x00));
        assert_eq!(bundle.extract(5).unwrap_err(), Error::NoStorageSlot(5));
    }

    #[test]
    fn test_names() {
        let mut bundle = Bundle::new();
        bundle.set_name(0, "TEST FILE").unwrap();
        assert_eq!(bundle.name(0).unwrap(), "TEST");
        assert_eq!(bundle.name(511).unwrap_err(), Error::InvalidSlot(511));
        assert_eq!(bundle.set_name(511, "X").unwrap_err(), Error::InvalidSlot(511));
    }

    #[test]
    fn test_rename_clears_stale_tail() {
        let mut bundle = Bundle::new();
        bundle.set_name(4, "LONGERNAME").unwrap();
        bundle.set_name(4, "SHORT").unwrap();
        assert_eq!(bundle.name(4).unwrap(), "SHORT");
    }

    #[test]
    fn test_rename_legacy_keeps_stale_tail() {
        let mut bundle = Bundle::with_config(0, BundleConfig::legacy()).unwrap();
        bundle.set_name(4, "LONGERNAME").unwrap();
        bundle.set_name(4, "SHORT").unwrap();
        assert_eq!(bundle.name(4).unwrap(), "SHORTRNAME");
    }

    #[test]
    fn test_resize_grow_and_shrink() {
        let mut bundle = Bundle::new();
        bundle.set_boot_slot(1, 3).unwrap();
        bundle.set_name(0, "KEEP").unwrap();

        bundle.change_storage_size(3).unwrap();
        assert_eq!(bundle.storage_size(), 3);
        assert_eq!(bundle.as_bytes().len(), bundle_length(3));
        assert_eq!(bundle.boot_slot(1).unwrap(), 3);
        assert_eq!(bundle.name(0).unwrap(), "KEEP");
        assert_eq!(flag_byte(&bundle, 2), 0xF0);

        bundle.change_storage_size(1).unwrap();
        assert_eq!(bundle.storage_size(), 1);
        assert_eq!(bundle.as_bytes().len(), bundle_length(1));
    }

    #[test]
    fn test_resize_preserves_disk_data() {
        let mut bundle = Bundle::with_slots(1).unwrap();
        bundle.insert(0, vec![0x42; DISK_SIZE]).unwrap();
        bundle.activate(0).unwrap();

        bundle.change_storage_size(4).unwrap();
        assert_eq!(bundle.extract(0).unwrap().as_bytes(), &vec![0x42; DISK_SIZE][..]);
        assert!(bundle.as_bytes()[HEADER_SIZE + DISK_SIZE..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_resize_same_size_keeps_allocation() {
        let mut bundle = Bundle::with_slots(2).unwrap();
        let before = bundle.as_bytes().as_ptr();
        bundle.change_storage_size(2).unwrap();
        assert_eq!(bundle.as_bytes().as_ptr(), before);
    }

    #[test]
    fn test_resize_reports_lowest_occupied_slot() {
        let mut bundle = Bundle::with_slots(6).unwrap();
        bundle.activate(5).unwrap();
        bundle.activate(3).unwrap();

        assert_eq!(
            bundle.change_storage_size(1).unwrap_err(),
            Error::ResizeWouldTruncate { slot: 3 }
        );
        assert_eq!(bundle.storage_size(), 6);

        assert_eq!(
            bundle.change_storage_size(4).unwrap_err(),
            Error::ResizeWouldTruncate { slot: 5 }
        );
        assert!(bundle.change_storage_size(6).is_ok());
    }

    #[test]
    fn test_resize_out_of_range() {
        let mut bundle = Bundle::new();
        assert_eq!(bundle.change_storage_size(512).unwrap_err(), Error::InvalidSlot(512));
        assert!(bundle.change_storage_size(511).is_ok());
        assert_eq!(bundle.storage_size(), 511);
    }

    #[test]
    fn test_catalogue_listing() {
        let mut bundle = Bundle::with_slots(3).unwrap();
        bundle.activate(1).unwrap();
        bundle.set_name(1, "GAMES").unwrap();

        let listing = bundle.catalogue();
        assert_eq!(listing.len(), 3);
        assert!(!listing[0].occupied);
        assert!(!listing[0].locked);
        assert!(listing[1].occupied);
        assert!(listing[1].locked);
        assert_eq!(listing[1].name, "GAMES");

        assert_eq!(bundle.find_slot("GAMES"), Some(1));
        assert_eq!(bundle.find_slot("MISSING"), None);
        assert_eq!(bundle.first_free_slot(), Some(0));
    }

    #[test]
    fn test_first_free_slot_when_full() {
        let mut bundle = Bundle::with_slots(1).unwrap();
        bundle.activate(0).unwrap();
        assert_eq!(bundle.first_free_slot(), None);
        assert!(!bundle.slot_info(5).unwrap().has_storage);
    }
}

//! Retirement bitmap persisted inside the region
//!
//! Each bit represents one data slot:
//! - 0 = live slot, reachable through a virtual offset
//! - 1 = retired slot, permanently excluded until a full reset
//!
//! The bitmap lives on the same medium it describes, so it is never cached:
//! every query reads the control bytes back from the store.

use crate::core::region::Region;
use crate::core::store::RawStore;

/// View of the retirement bitmap of one region
#[derive(Debug, Clone, Copy)]
pub struct RetirementBitmap {
    region: Region,
}

impl RetirementBitmap {
    /// Create a view over the control bytes of `region`
    pub fn new(region: Region) -> Self {
        RetirementBitmap { region }
    }

    /// Read the control byte covering `slot`
    #[inline]
    pub fn control_byte<S: RawStore + ?Sized>(&self, store: &S, slot: usize) -> u8 {
        store.read(self.region.control_addr(slot / 8))
    }

    /// Check if a specific slot is retired
    pub fn is_retired<S: RawStore + ?Sized>(&self, store: &S, slot: usize) -> bool {
        if slot >= self.region.data() {
            return false;
        }

        (self.control_byte(store, slot) >> (slot % 8)) & 1 == 1
    }

    /// Count retired slots
    ///
    /// Padding bits beyond the last data slot are ignored.
    pub fn count_retired<S: RawStore + ?Sized>(&self, store: &S) -> usize {
        let data = self.region.data();
        let mut retired = 0usize;

        for index in 0..self.region.control() {
            let mut byte = store.read(self.region.control_addr(index));
            let first_slot = index * 8;
            if first_slot + 8 > data {
                // Mask off bits past the last data slot
                let live_bits = data - first_slot;
                byte &= (1u16 << live_bits).wrapping_sub(1) as u8;
            }
            retired += byte.count_ones() as usize;
        }

        retired
    }

    /// Persist the retirement of `slot`
    ///
    /// Read-modify-write of the covering control byte, verified up to
    /// `attempts` times. Returns `false` if the bit could not be persisted
    /// (the control cell itself is worn out).
    pub fn retire<S: RawStore + ?Sized>(&self, store: &mut S, slot: usize, attempts: u8) -> bool {
        debug_assert!(slot < self.region.data());

        let addr = self.region.control_addr(slot / 8);
        let mask = 1u8 << (slot % 8);

        for _ in 0..attempts {
            let current = store.read(addr);
            if current & mask != 0 {
                return true;
            }
            store.write(addr, current | mask);
            if store.read(addr) & mask != 0 {
                return true;
            }
        }

        tracing::warn!(
            "Control byte at {} is worn out: slot {} cannot be retired",
            addr,
            slot
        );
        false
    }
}

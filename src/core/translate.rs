//! Virtual-to-physical address translation
//!
//! Live slots receive virtual offsets densely, in the same order as their
//! physical position; retired slots are skipped. Virtual offset `v` maps to
//! the (v+1)-th live slot counted from the start of the data area.
//!
//! The bitmap can change between any two calls, so translation is recomputed
//! from the medium every time.

use crate::core::region::Region;
use crate::core::store::RawStore;

/// Translate virtual offset `virtual_offset` to a data slot index
///
/// Returns `None` when fewer than `virtual_offset + 1` live slots exist.
pub fn physical_slot<S: RawStore + ?Sized>(
    store: &S,
    region: &Region,
    virtual_offset: usize,
) -> Option<usize> {
    let data = region.data();
    let mut remaining = virtual_offset;

    for index in 0..region.control() {
        let first_slot = index * 8;
        if first_slot >= data {
            break;
        }

        let retired = store.read(region.control_addr(index));
        let last_slot = (first_slot + 8).min(data);

        // Whole byte of live slots that can be skipped at once
        if retired == 0 && last_slot - first_slot <= remaining {
            remaining -= last_slot - first_slot;
            continue;
        }

        for slot in first_slot..last_slot {
            if (retired >> (slot - first_slot)) & 1 == 1 {
                continue;
            }
            if remaining == 0 {
                return Some(slot);
            }
            remaining -= 1;
        }
    }

    None
}

/// Translate with saturation at the last data slot
pub fn physical_slot_saturating<S: RawStore + ?Sized>(
    store: &S,
    region: &Region,
    virtual_offset: usize,
) -> usize {
    physical_slot(store, region, virtual_offset).unwrap_or(region.data() - 1)
}

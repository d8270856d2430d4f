//! Wear-leveling engine
//!
//! Presents a dense virtual address space over a region of a medium whose
//! cells wear out. Every physical write is verified by reading it back; a cell
//! that keeps failing is retired in the bitmap and the live tail is shifted so
//! virtual offsets stay gap-free.
//!
//! ```text
//! caller --read/write(v)--> engine --translate--> slot --> RawStore
//!                             |
//!                             +-- verify failed N times
//!                                   -> retire slot (bitmap)
//!                                   -> offset_right (shift tail)
//!                                   -> retry on the new slot
//! ```

use crate::core::bitmap::RetirementBitmap;
use crate::core::compaction::CompactionState;
use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::core::region::Region;
use crate::core::store::RawStore;
use crate::core::translate::{physical_slot, physical_slot_saturating};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Value returned by reads outside the addressable range
pub const SENTINEL: u8 = 0;

/// Outcome of a write or update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// The value was written and verified
    Committed,

    /// The stored value already matched; nothing was written
    Unchanged,

    /// No spare capacity was left to absorb a worn-out cell; the write was
    /// abandoned
    Depleted,
}

/// Snapshot of the capacity counters of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityStats {
    /// Bytes reserved on the medium
    pub total: usize,
    /// Data slots in the region
    pub data: usize,
    /// Bitmap bytes in the region
    pub control: usize,
    /// Live (non-retired) data slots
    pub net: usize,
    /// Virtual offsets committed since the last reset
    pub allocated: usize,
}

impl CapacityStats {
    /// Percentage of data slots still live
    pub fn health(&self) -> f64 {
        if self.data == 0 {
            0.0
        } else {
            (self.net as f64 / self.data as f64) * 100.0
        }
    }

    /// Retired data slots
    pub fn retired(&self) -> usize {
        self.data - self.net
    }
}

/// Wear-leveling store over one region of a [`RawStore`]
pub struct WearLevelingEngine<S: RawStore> {
    pub(crate) store: S,
    pub(crate) region: Region,
    pub(crate) bitmap: RetirementBitmap,

    /// Write-verify attempts per physical write
    pub(crate) write_attempts: u8,

    /// Live data slots; always `data - retired bits`
    pub(crate) net: usize,

    /// High-water mark of committed virtual offsets, plus one
    pub(crate) allocated: usize,
}

impl<S: RawStore> WearLevelingEngine<S> {
    /// Create an engine over the region described by `config`
    ///
    /// Scans the persisted bitmap once to learn how many slots are live. A
    /// medium that was never formatted holds arbitrary bitmap bits; call
    /// [`full_reset`](Self::full_reset) before first use.
    pub fn new(store: S, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let store_len = store.len();
        let region = Region::new(
            config.base,
            config.length.unwrap_or(store_len),
            store_len,
        )?;
        let bitmap = RetirementBitmap::new(region);
        let net = region.data() - bitmap.count_retired(&store);

        info!(
            "Opened region at {} ({} bytes: {} data, {} control), {} live slots",
            region.base(),
            region.total(),
            region.data(),
            region.control(),
            net
        );

        Ok(WearLevelingEngine {
            store,
            region,
            bitmap,
            write_attempts: config.write_attempts,
            net,
            allocated: 0,
        })
    }

    /// Create an engine spanning the whole medium with default settings
    pub fn with_store(store: S) -> Result<Self> {
        Self::new(store, EngineConfig::default())
    }

    /// Read the byte at virtual offset `virtual_offset`
    ///
    /// Offsets at or beyond [`net_length`](Self::net_length) return
    /// [`SENTINEL`].
    pub fn read(&self, virtual_offset: usize) -> u8 {
        if virtual_offset >= self.net {
            return SENTINEL;
        }

        match physical_slot(&self.store, &self.region, virtual_offset) {
            Some(slot) => self.store.read(self.region.data_addr(slot)),
            None => SENTINEL,
        }
    }

    /// Write `data` at virtual offset `virtual_offset`
    ///
    /// The offset is clamped to the live range. The allocation record is
    /// updated before the physical write, so a wear-out during the write
    /// still accounts for the offset when the tail is shifted.
    pub fn write(&mut self, virtual_offset: usize, data: u8) -> WriteStatus {
        if self.net == 0 {
            warn!("Write to {} dropped: region is depleted", virtual_offset);
            return WriteStatus::Depleted;
        }

        let virtual_offset = virtual_offset.min(self.net - 1);
        self.allocated = self.allocated.max(virtual_offset + 1);

        loop {
            if self.commit(virtual_offset, data) {
                self.check_invariants();
                return WriteStatus::Committed;
            }

            match self.offset_right(virtual_offset) {
                CompactionState::Available => continue,
                _ => {
                    warn!(
                        "Write to {} abandoned: {} live slots, {} allocated",
                        virtual_offset, self.net, self.allocated
                    );
                    return WriteStatus::Depleted;
                }
            }
        }
    }

    /// Write only when the stored value differs
    ///
    /// Saves endurance on no-op writes. A matching value still counts as
    /// allocated, so compaction keeps it in place.
    pub fn update(&mut self, virtual_offset: usize, data: u8) -> WriteStatus {
        if self.net == 0 {
            return WriteStatus::Depleted;
        }

        let virtual_offset = virtual_offset.min(self.net - 1);
        if self.read(virtual_offset) == data {
            self.allocated = self.allocated.max(virtual_offset + 1);
            return WriteStatus::Unchanged;
        }

        self.write(virtual_offset, data)
    }

    /// Zero the whole region (data and bitmap) and restore the counters
    ///
    /// Endurance already consumed is not restored: a dead cell fails
    /// verification again on first use and is retired again.
    pub fn full_reset(&mut self) {
        for addr in self.region.addresses() {
            self.store.write(addr, 0);
        }

        self.net = self.region.data() - self.bitmap.count_retired(&self.store);
        self.allocated = 0;

        if self.net < self.region.data() {
            warn!(
                "Full reset left {} slots retired: bitmap cells are worn out",
                self.region.data() - self.net
            );
        }
        info!("Region at {} reset, {} live slots", self.region.base(), self.net);
    }

    /// Live data slots (virtual capacity)
    pub fn net_length(&self) -> usize {
        self.net
    }

    /// Virtual offsets committed since the last reset
    pub fn allocated_length(&self) -> usize {
        self.allocated
    }

    /// Bytes reserved on the medium
    pub fn total_length(&self) -> usize {
        self.region.total()
    }

    /// Data slots in the region
    pub fn data_length(&self) -> usize {
        self.region.data()
    }

    /// Bitmap bytes in the region
    pub fn control_length(&self) -> usize {
        self.region.control()
    }

    /// Medium address backing virtual offset `virtual_offset`
    ///
    /// The offset is clamped to the live range; with no live slots left the
    /// address of the last data slot is returned.
    pub fn physical_byte(&self, virtual_offset: usize) -> usize {
        let virtual_offset = virtual_offset.min(self.net.saturating_sub(1));
        self.region
            .data_addr(physical_slot_saturating(&self.store, &self.region, virtual_offset))
    }

    /// Whether data slot `slot` has been retired
    pub fn is_retired(&self, slot: usize) -> bool {
        self.bitmap.is_retired(&self.store, slot)
    }

    /// Whether another worn-out cell can still be absorbed by compaction
    pub fn state(&self) -> CompactionState {
        if self.allocated < self.net {
            CompactionState::Available
        } else {
            CompactionState::Depleted
        }
    }

    /// Snapshot of the capacity counters
    pub fn stats(&self) -> CapacityStats {
        CapacityStats {
            total: self.region.total(),
            data: self.region.data(),
            control: self.region.control(),
            net: self.net,
            allocated: self.allocated,
        }
    }

    /// Layout of the reserved region
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Write-verify attempts per physical write
    pub fn write_attempts(&self) -> u8 {
        self.write_attempts
    }

    /// Get access to the underlying medium
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get mutable access to the underlying medium
    ///
    /// Writing to the region through this handle bypasses the engine's
    /// bookkeeping.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Release the underlying medium
    pub fn into_store(self) -> S {
        self.store
    }

    /// Write `data` to the slot behind `virtual_offset` and read it back
    ///
    /// Returns `false` once the retry budget is spent without the value
    /// persisting.
    pub(crate) fn commit(&mut self, virtual_offset: usize, data: u8) -> bool {
        let Some(slot) = physical_slot(&self.store, &self.region, virtual_offset) else {
            return false;
        };
        let addr = self.region.data_addr(slot);

        for attempt in 1..=self.write_attempts {
            self.store.write(addr, data);
            if self.store.read(addr) == data {
                return true;
            }
            debug!(
                "Verify failed at {} (virtual {}), attempt {}/{}",
                addr, virtual_offset, attempt, self.write_attempts
            );
        }

        false
    }

    /// Retire the slot currently behind `virtual_offset`
    pub(crate) fn retire(&mut self, virtual_offset: usize) -> bool {
        let Some(slot) = physical_slot(&self.store, &self.region, virtual_offset) else {
            return false;
        };

        if !self.bitmap.retire(&mut self.store, slot, self.write_attempts) {
            return false;
        }

        self.net -= 1;
        debug!(
            "Retired slot {} (virtual {}), {} live slots remain",
            slot, virtual_offset, self.net
        );
        true
    }

    fn check_invariants(&self) {
        // allocated may exceed net after a depletion, so only net is checked
        debug_assert!(self.net <= self.region.data());
        debug_assert_eq!(
            self.net,
            self.region.data() - self.bitmap.count_retired(&self.store)
        );
    }
}

impl<S: RawStore> std::fmt::Debug for WearLevelingEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WearLevelingEngine")
            .field("region", &self.region)
            .field("write_attempts", &self.write_attempts)
            .field("net", &self.net)
            .field("allocated", &self.allocated)
            .finish()
    }
}

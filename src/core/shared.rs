//! Serialised access to one region from several threads
//!
//! Translation, bitmap and counters form one unit of consistency, so every
//! operation holds the region's lock for its full duration, including any
//! retirement and compaction it triggers.

use crate::core::compaction::CompactionState;
use crate::core::engine::{CapacityStats, WearLevelingEngine, WriteStatus};
use crate::core::store::RawStore;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Cloneable, thread-safe handle to a [`WearLevelingEngine`]
pub struct SharedEngine<S: RawStore> {
    inner: Arc<Mutex<WearLevelingEngine<S>>>,
}

impl<S: RawStore> SharedEngine<S> {
    /// Wrap an engine for shared use
    pub fn new(engine: WearLevelingEngine<S>) -> Self {
        SharedEngine {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Read the byte at `virtual_offset`
    pub fn read(&self, virtual_offset: usize) -> u8 {
        self.inner.lock().read(virtual_offset)
    }

    /// Write-verify `data` at `virtual_offset`
    pub fn write(&self, virtual_offset: usize, data: u8) -> WriteStatus {
        self.inner.lock().write(virtual_offset, data)
    }

    /// Write only when the stored value differs
    pub fn update(&self, virtual_offset: usize, data: u8) -> WriteStatus {
        self.inner.lock().update(virtual_offset, data)
    }

    /// Zero the region and restore its counters
    pub fn full_reset(&self) {
        self.inner.lock().full_reset()
    }

    /// Live data slots
    pub fn net_length(&self) -> usize {
        self.inner.lock().net_length()
    }

    /// Virtual offsets committed since the last reset
    pub fn allocated_length(&self) -> usize {
        self.inner.lock().allocated_length()
    }

    /// Whether spare capacity remains
    pub fn state(&self) -> CompactionState {
        self.inner.lock().state()
    }

    /// Snapshot of the capacity counters
    pub fn stats(&self) -> CapacityStats {
        self.inner.lock().stats()
    }

    /// Hold the lock across several operations
    pub fn lock(&self) -> MutexGuard<'_, WearLevelingEngine<S>> {
        self.inner.lock()
    }
}

impl<S: RawStore> Clone for SharedEngine<S> {
    fn clone(&self) -> Self {
        SharedEngine {
            inner: Arc::clone(&self.inner),
        }
    }
}

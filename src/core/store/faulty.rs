//! Fault-injecting medium with a finite write budget per cell
//!
//! Each byte starts with random contents and a random remaining-write budget.
//! Every write consumes one unit of budget; once the budget is gone the cell is
//! worn out and further writes are silently dropped, while reads keep
//! returning the last value that did persist.

use super::RawStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

/// Default endurance range for freshly created cells
pub const DEFAULT_ENDURANCE: RangeInclusive<u32> = 35_536..=65_535;

/// Simulated medium whose cells wear out after a finite number of writes
#[derive(Debug, Clone)]
pub struct FaultyStore {
    /// Current cell contents
    bytes: Vec<u8>,

    /// Remaining successful writes per cell
    endurance: Vec<u32>,

    /// Write calls issued against the medium
    write_count: u64,

    /// Write calls that actually changed a cell
    applied_count: u64,
}

impl FaultyStore {
    /// Create a medium seeded from the thread-local RNG
    pub fn new(size: usize) -> Self {
        Self::from_rng(size, DEFAULT_ENDURANCE, &mut rand::thread_rng())
    }

    /// Create a reproducible medium from `seed`
    pub fn seeded(size: usize, seed: u64) -> Self {
        Self::from_rng(size, DEFAULT_ENDURANCE, &mut StdRng::seed_from_u64(seed))
    }

    /// Create a reproducible medium with a custom endurance range
    ///
    /// Small ranges make wear-out reachable in a handful of writes, which is
    /// how the retirement path gets exercised in tests.
    pub fn with_endurance(size: usize, endurance: RangeInclusive<u32>, seed: u64) -> Self {
        Self::from_rng(size, endurance, &mut StdRng::seed_from_u64(seed))
    }

    /// Create a zero-filled medium where every cell has exactly `budget` writes
    pub fn uniform(size: usize, budget: u32) -> Self {
        FaultyStore {
            bytes: vec![0u8; size],
            endurance: vec![budget; size],
            write_count: 0,
            applied_count: 0,
        }
    }

    fn from_rng<R: Rng>(size: usize, endurance: RangeInclusive<u32>, rng: &mut R) -> Self {
        let mut bytes = Vec::with_capacity(size);
        let mut budgets = Vec::with_capacity(size);
        for _ in 0..size {
            bytes.push(rng.gen::<u8>());
            budgets.push(rng.gen_range(endurance.clone()));
        }

        FaultyStore {
            bytes,
            endurance: budgets,
            write_count: 0,
            applied_count: 0,
        }
    }

    /// Remaining write budget of the cell at `addr`
    pub fn endurance(&self, addr: usize) -> u32 {
        self.endurance[addr]
    }

    /// Override the remaining write budget of the cell at `addr`
    pub fn set_endurance(&mut self, addr: usize, budget: u32) {
        self.endurance[addr] = budget;
    }

    /// Wear out the cell at `addr` immediately
    pub fn exhaust(&mut self, addr: usize) {
        self.endurance[addr] = 0;
    }

    /// Whether the cell at `addr` can still change state
    pub fn is_worn(&self, addr: usize) -> bool {
        self.endurance[addr] == 0
    }

    /// Number of write calls issued, persisted or not
    pub fn write_count(&self) -> u64 {
        self.write_count
    }

    /// Number of write calls that persisted
    pub fn applied_count(&self) -> u64 {
        self.applied_count
    }

    /// Raw view of the whole medium
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl RawStore for FaultyStore {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn read(&self, addr: usize) -> u8 {
        self.bytes[addr]
    }

    fn write(&mut self, addr: usize, data: u8) {
        self.write_count += 1;
        if self.endurance[addr] > 0 {
            self.bytes[addr] = data;
            self.endurance[addr] -= 1;
            self.applied_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let a = FaultyStore::seeded(64, 42);
        let b = FaultyStore::seeded(64, 42);
        assert_eq!(a.as_bytes(), b.as_bytes());
        for addr in 0..64 {
            assert_eq!(a.endurance(addr), b.endurance(addr));
        }
    }

    #[test]
    fn test_default_endurance_range() {
        let store = FaultyStore::seeded(256, 7);
        for addr in 0..store.len() {
            assert!(DEFAULT_ENDURANCE.contains(&store.endurance(addr)));
        }
    }

    #[test]
    fn test_write_consumes_budget() {
        let mut store = FaultyStore::uniform(4, 2);

        store.write(1, 0xAA);
        assert_eq!(store.read(1), 0xAA);
        assert_eq!(store.endurance(1), 1);

        store.write(1, 0xBB);
        assert_eq!(store.read(1), 0xBB);
        assert!(store.is_worn(1));

        // Worn cell keeps its last value
        store.write(1, 0xCC);
        assert_eq!(store.read(1), 0xBB);

        assert_eq!(store.write_count(), 3);
        assert_eq!(store.applied_count(), 2);
    }

    #[test]
    fn test_exhaust_does_not_touch_neighbours() {
        let mut store = FaultyStore::uniform(3, 10);
        store.exhaust(1);

        store.write(0, 1);
        store.write(1, 2);
        store.write(2, 3);

        assert_eq!(store.as_bytes(), &[1, 0, 3]);
    }

    #[test]
    fn test_update_only_writes_on_change() {
        let mut store = FaultyStore::uniform(2, 10);
        store.update(0, 0);
        assert_eq!(store.write_count(), 0);

        store.update(0, 5);
        store.update(0, 5);
        assert_eq!(store.write_count(), 1);
    }
}

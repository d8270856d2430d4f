//! Retirement and compaction ("offset right")
//!
//! When the slot behind virtual offset `f` wears out it is retired, which
//! removes it from translation: every offset `>= f` now resolves one live slot
//! further along and reads the value of its right-hand neighbour. The live
//! tail is then walked from the allocation high-water mark down to `f + 1`,
//! copying `read(i - 1)` into `i`, which moves the tail one slot to the right
//! physically and restores every offset to its previous value.
//!
//! ```text
//! before        [ A ][ B ][ C ][ D ][   ]      f = 1 (B's slot dies)
//! retire        [ A ][ x ][ C ][ D ][   ]      reads: A C D ?
//! shift 3 <- 2  [ A ][ x ][ C ][ D ][ D ]
//! shift 2 <- 1  [ A ][ x ][ C ][ C ][ D ]      reads: A C C D
//! retry f       [ A ][ x ][ B'][ C ][ D ]      reads: A B' C D
//! ```
//!
//! A shifted write can wear out its own slot. Retiring that slot leaves every
//! offset `>= f` reading its right-hand neighbour again, exactly the state
//! right after the first retirement, so the walk simply restarts from the
//! top. Each restart retires one slot, which bounds the loop by the size of
//! the data area.
//!
//! Without spare capacity beyond the allocated range there is nowhere to
//! shift into: the slot is still retired (it is dead either way) and the tail
//! stays shifted left by one.

use crate::core::engine::WearLevelingEngine;
use crate::core::store::RawStore;
use tracing::{debug, warn};

/// Compaction state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactionState {
    /// Compaction finished and spare capacity remains
    Available,

    /// Tail shift in progress (never observable outside compaction)
    Offsetting,

    /// No spare capacity left to absorb the retirement
    Depleted,
}

impl<S: RawStore> WearLevelingEngine<S> {
    /// Retire the worn slot behind `failed` and shift the live tail over it
    pub(crate) fn offset_right(&mut self, failed: usize) -> CompactionState {
        let mut state = CompactionState::Offsetting;
        let mut worn = failed;
        let mut passes = 0usize;

        while state == CompactionState::Offsetting {
            if passes == self.region.data() {
                state = CompactionState::Depleted;
                break;
            }
            passes += 1;

            if !self.retire(worn) {
                warn!("Cannot retire worn slot behind virtual {}", worn);
                state = CompactionState::Depleted;
                continue;
            }

            if self.allocated > self.net {
                warn!(
                    "Region depleted: {} allocated, {} live slots",
                    self.allocated, self.net
                );
                state = CompactionState::Depleted;
                continue;
            }

            state = match self.shift_tail(failed) {
                Ok(()) => CompactionState::Available,
                Err(next) => {
                    debug!("Shift into virtual {} failed, restarting walk", next);
                    worn = next;
                    CompactionState::Offsetting
                }
            };
        }

        state
    }

    /// Copy `read(i - 1)` into `i` for `i` from the high-water mark down to
    /// `failed + 1`
    ///
    /// Returns the offset whose slot failed verification, if any.
    fn shift_tail(&mut self, failed: usize) -> Result<(), usize> {
        for i in (failed + 1..self.allocated).rev() {
            let value = self.read(i - 1);
            if self.read(i) == value {
                continue;
            }
            if !self.commit(i, value) {
                return Err(i);
            }
        }

        debug!(
            "Shifted virtual {}..{} right by one slot",
            failed + 1,
            self.allocated
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::WriteStatus;
    use crate::core::store::FaultyStore;

    fn engine(total: usize) -> WearLevelingEngine<FaultyStore> {
        let mut engine = WearLevelingEngine::with_store(FaultyStore::uniform(total, 1000)).unwrap();
        engine.full_reset();
        engine
    }

    fn fill(engine: &mut WearLevelingEngine<FaultyStore>, values: &[u8]) {
        for (v, &value) in values.iter().enumerate() {
            assert_eq!(engine.write(v, value), WriteStatus::Committed);
        }
    }

    fn contents(engine: &WearLevelingEngine<FaultyStore>, len: usize) -> Vec<u8> {
        (0..len).map(|v| engine.read(v)).collect()
    }

    #[test]
    fn test_shift_preserves_every_offset() {
        let mut engine = engine(18); // 16 data slots
        fill(&mut engine, &[1, 2, 3, 4, 5, 6]);

        let addr = engine.physical_byte(2);
        engine.store_mut().exhaust(addr);

        assert_eq!(engine.write(2, 30), WriteStatus::Committed);
        assert_eq!(contents(&engine, 6), vec![1, 2, 30, 4, 5, 6]);
        assert_eq!(engine.net_length(), 15);
        assert!(engine.is_retired(2));
        assert_eq!(engine.physical_byte(2), 3);
        assert_eq!(engine.physical_byte(5), 6);
    }

    #[test]
    fn test_offset_right_reports_available() {
        let mut engine = engine(18);
        fill(&mut engine, &[9, 8, 7]);

        let addr = engine.physical_byte(0);
        engine.store_mut().exhaust(addr);

        assert_eq!(engine.offset_right(0), CompactionState::Available);
        // Offset 0 now resolves to the old neighbour's slot until the caller retries
        assert_eq!(contents(&engine, 3), vec![8, 8, 7]);
        assert_eq!(engine.net_length(), 15);
    }

    #[test]
    fn test_cascading_failure_during_shift() {
        let mut engine = engine(27); // 24 data slots
        fill(&mut engine, &[10, 20, 30, 40, 50, 60, 70, 80]);

        // Slot behind offset 1 dies, and so does the slot the walk shifts 5 into
        let first = engine.physical_byte(1);
        let second = engine.physical_byte(6);
        engine.store_mut().exhaust(first);
        engine.store_mut().exhaust(second);

        assert_eq!(engine.write(1, 21), WriteStatus::Committed);
        assert_eq!(contents(&engine, 8), vec![10, 21, 30, 40, 50, 60, 70, 80]);
        assert_eq!(engine.net_length(), 22);
        assert!(engine.is_retired(1));
        assert!(engine.is_retired(6));
    }

    #[test]
    fn test_no_spare_capacity_depletes() {
        let mut engine = engine(9); // 8 data slots
        fill(&mut engine, &[1, 2, 3, 4, 5, 6, 7, 8]);

        let addr = engine.physical_byte(5);
        engine.store_mut().exhaust(addr);

        assert_eq!(engine.write(5, 60), WriteStatus::Depleted);
        assert_eq!(engine.net_length(), 7);
        // Slot retired, tail reads shifted left by one
        assert_eq!(contents(&engine, 7), vec![1, 2, 3, 4, 5, 7, 8]);
        assert_eq!(engine.state(), CompactionState::Depleted);
    }

    #[test]
    fn test_worn_control_byte_depletes_without_retiring() {
        let mut engine = engine(18);
        fill(&mut engine, &[1, 2, 3]);

        let control = engine.region().control_addr(0);
        let addr = engine.physical_byte(1);
        engine.store_mut().exhaust(control);
        engine.store_mut().exhaust(addr);

        assert_eq!(engine.write(1, 99), WriteStatus::Depleted);
        assert_eq!(engine.net_length(), 16);
        assert!(!engine.is_retired(1));
        assert_eq!(contents(&engine, 3), vec![1, 2, 3]);
    }
}

//! Raw byte media underneath the wear-leveling engine
//!
//! Every medium, real or simulated, implements [`RawStore`]:
//! - [`MemoryStore`]: healthy in-memory medium that never wears
//! - [`FileStore`]: memory-mapped file, one byte per cell
//! - [`FaultyStore`]: fault-injecting double with a per-cell endurance budget
//! - [`SharedStore`]: cloneable handle so disjoint regions can share one medium

pub mod faulty;
pub mod file;
pub mod memory;
pub mod shared;

pub use faulty::FaultyStore;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use shared::SharedStore;

/// Byte-addressable medium with best-effort writes
///
/// Writes are not guaranteed to persist: a cell that has exhausted its
/// endurance silently keeps its previous value. Implementations must never
/// panic on a worn cell and must never disturb neighbouring bytes.
pub trait RawStore {
    /// Number of addressable bytes
    fn len(&self) -> usize;

    /// Whether the medium has no addressable bytes
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the byte at `addr` (`addr < len()`)
    fn read(&self, addr: usize) -> u8;

    /// Best-effort write of `data` at `addr` (`addr < len()`)
    fn write(&mut self, addr: usize, data: u8);

    /// Write only when the stored value differs
    fn update(&mut self, addr: usize, data: u8) {
        if self.read(addr) != data {
            self.write(addr, data);
        }
    }
}

impl<S: RawStore + ?Sized> RawStore for &mut S {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn read(&self, addr: usize) -> u8 {
        (**self).read(addr)
    }

    fn write(&mut self, addr: usize, data: u8) {
        (**self).write(addr, data)
    }
}

impl<S: RawStore + ?Sized> RawStore for Box<S> {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn read(&self, addr: usize) -> u8 {
        (**self).read(addr)
    }

    fn write(&mut self, addr: usize, data: u8) {
        (**self).write(addr, data)
    }
}

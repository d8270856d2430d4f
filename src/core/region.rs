//! Physical layout of a reserved region
//!
//! ```text
//! base
//!  |
//!  v
//! [ data 0 ][ data 1 ] ... [ data D-1 ][ control 0 ] ... [ control C-1 ]
//!
//! C = ceil(total / 9)
//! D = total - C
//! ```
//!
//! One control bit covers one data slot, so every 9 bytes of the region buy
//! 8 data slots plus the byte that tracks them.

use crate::core::error::{Result, WearError};

/// Region bytes per control byte (8 data slots + 1 bitmap byte)
pub const CONTROL_RATIO: usize = 9;

/// A contiguous byte range of the medium owned by one engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    base: usize,
    total: usize,
    data: usize,
    control: usize,
}

impl Region {
    /// Reserve `length` bytes starting at `base` on a medium of `store_len`
    /// bytes
    ///
    /// The length is clamped to the medium, then the base is pulled back so
    /// the region fits entirely inside it.
    pub fn new(base: usize, length: usize, store_len: usize) -> Result<Self> {
        if store_len == 0 {
            return Err(WearError::EmptyStore);
        }

        let total = length.min(store_len);
        let base = base.min(store_len - total);
        let control = total.div_ceil(CONTROL_RATIO);
        let data = total - control;

        if data == 0 {
            return Err(WearError::RegionTooSmall { total });
        }

        Ok(Region {
            base,
            total,
            data,
            control,
        })
    }

    /// First byte of the region on the medium
    pub fn base(&self) -> usize {
        self.base
    }

    /// Total bytes reserved (data + control)
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of data slots
    pub fn data(&self) -> usize {
        self.data
    }

    /// Number of bitmap bytes
    pub fn control(&self) -> usize {
        self.control
    }

    /// Medium address of data slot `slot`
    #[inline]
    pub fn data_addr(&self, slot: usize) -> usize {
        debug_assert!(slot < self.data);
        self.base + slot
    }

    /// Medium address of control byte `index`
    #[inline]
    pub fn control_addr(&self, index: usize) -> usize {
        debug_assert!(index < self.control);
        self.base + self.data + index
    }

    /// Every medium address covered by the region
    pub fn addresses(&self) -> std::ops::Range<usize> {
        self.base..self.base + self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nine_byte_region() {
        let region = Region::new(0, 9, 9).unwrap();
        assert_eq!(region.data(), 8);
        assert_eq!(region.control(), 1);
        assert_eq!(region.control_addr(0), 8);
    }

    #[test]
    fn test_rounding_up_control() {
        // ceil(100 / 9) = 12 control bytes
        let region = Region::new(50, 100, 256).unwrap();
        assert_eq!(region.base(), 50);
        assert_eq!(region.control(), 12);
        assert_eq!(region.data(), 88);
        assert_eq!(region.data_addr(0), 50);
        assert_eq!(region.control_addr(0), 138);
        assert_eq!(region.addresses(), 50..150);
    }

    #[test]
    fn test_bitmap_covers_every_slot() {
        for total in 2..2000 {
            let region = Region::new(0, total, total).unwrap();
            assert!(region.control() * 8 >= region.data(), "total {}", total);
        }
    }

    #[test]
    fn test_length_and_base_clamped() {
        let region = Region::new(200, 500, 256).unwrap();
        assert_eq!(region.total(), 256);
        assert_eq!(region.base(), 0);

        let region = Region::new(250, 100, 256).unwrap();
        assert_eq!(region.base(), 156);
        assert_eq!(region.addresses().end, 256);
    }

    #[test]
    fn test_too_small() {
        assert!(matches!(
            Region::new(0, 1, 16),
            Err(WearError::RegionTooSmall { total: 1 })
        ));
        assert!(matches!(Region::new(0, 4, 0), Err(WearError::EmptyStore)));
    }

    #[test]
    fn test_two_bytes_is_smallest_region() {
        let region = Region::new(0, 2, 2).unwrap();
        assert_eq!(region.data(), 1);
        assert_eq!(region.control(), 1);
    }
}

//! # Robust EEPROM - Wear-Leveling for Byte-Addressable NVM
//!
//! `robust-eeprom` presents a stable, gap-free virtual address space over a
//! non-volatile medium whose cells wear out one at a time:
//!
//! - **Write-verify-retry** on every physical write
//! - **Automatic retirement** of cells that stop holding their value
//! - **Compaction** that shifts live data over retired cells, so virtual
//!   offsets stay dense and only total capacity shrinks
//! - **Persisted bitmap** (one bit per data slot) stored inside the region
//!
//! ## Quick Start
//!
//! ```rust
//! use robust_eeprom::{MemoryStore, WearLevelingEngine, Result};
//!
//! # fn main() -> Result<()> {
//! let mut eeprom = WearLevelingEngine::with_store(MemoryStore::new(1024))?;
//! eeprom.full_reset();
//!
//! eeprom.write(0, 0x42);
//! assert_eq!(eeprom.read(0), 0x42);
//!
//! // Only writes when the stored value differs
//! eeprom.update(0, 0x42);
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Regions
//!
//! ```rust
//! use robust_eeprom::{EngineBuilder, FaultyStore, Result};
//!
//! # fn main() -> Result<()> {
//! // 100 bytes starting at offset 50 of a simulated, wearing medium
//! let mut eeprom = EngineBuilder::new()
//!     .base(50)
//!     .length(100)
//!     .write_attempts(3)
//!     .build(FaultyStore::seeded(256, 7))?;
//! eeprom.full_reset();
//!
//! assert_eq!(eeprom.data_length(), 88);
//! assert_eq!(eeprom.control_length(), 12);
//! # Ok(())
//! # }
//! ```

pub mod core;

pub use crate::core::{
    compaction::CompactionState,
    config::{EngineConfig, DEFAULT_WRITE_ATTEMPTS, MAX_WRITE_ATTEMPTS},
    engine::{CapacityStats, WearLevelingEngine, WriteStatus, SENTINEL},
    error::{Result, WearError},
    region::{Region, CONTROL_RATIO},
    shared::SharedEngine,
    store::{FaultyStore, FileStore, MemoryStore, RawStore, SharedStore},
};

use tracing::debug;

/// Builder for customizing engine creation
///
/// Provides a fluent API over [`EngineConfig`].
///
/// # Examples
///
/// ```rust
/// use robust_eeprom::{EngineBuilder, MemoryStore};
///
/// # fn main() -> robust_eeprom::Result<()> {
/// let eeprom = EngineBuilder::new()
///     .base(16)
///     .length(64)
///     .build(MemoryStore::new(256))?;
/// assert_eq!(eeprom.total_length(), 64);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    /// Create a new EngineBuilder with default settings
    pub fn new() -> Self {
        EngineBuilder {
            config: EngineConfig::default(),
        }
    }

    /// Start from an existing configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the first byte of the region on the medium
    pub fn base(mut self, base: usize) -> Self {
        self.config.base = base;
        self
    }

    /// Set the number of bytes reserved (defaults to the whole medium)
    pub fn length(mut self, length: usize) -> Self {
        self.config.length = Some(length);
        self
    }

    /// Set write-verify attempts before a cell is declared worn out
    pub fn write_attempts(mut self, attempts: u8) -> Self {
        self.config.write_attempts = attempts;
        self
    }

    /// Build the engine over `store`
    pub fn build<S: RawStore>(self, store: S) -> Result<WearLevelingEngine<S>> {
        debug!("Building engine with {:?}", self.config);
        WearLevelingEngine::new(store, self.config)
    }

    /// Build a thread-safe engine over `store`
    pub fn build_shared<S: RawStore>(self, store: S) -> Result<SharedEngine<S>> {
        self.build(store).map(SharedEngine::new)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

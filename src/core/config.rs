//! Engine configuration
//!
//! A region is described by where it starts on the medium, how many bytes it
//! reserves, and how many times a write is verified before the cell behind it
//! is declared worn out.
//!
//! ```toml
//! base = 50
//! length = 100
//! write_attempts = 3
//! ```

use crate::core::error::{Result, WearError};
use serde::{Deserialize, Serialize};

/// Write-verify attempts before a cell is treated as worn out
pub const DEFAULT_WRITE_ATTEMPTS: u8 = 3;

/// Upper bound on write-verify attempts
///
/// Each attempt costs one unit of endurance on a cell that is already
/// failing, so large budgets only burn the medium faster.
pub const MAX_WRITE_ATTEMPTS: u8 = 16;

/// Configuration for a single wear-leveled region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// First byte of the region on the medium
    pub base: usize,

    /// Bytes reserved for the region (`None` = the whole medium)
    pub length: Option<usize>,

    /// Write-verify attempts per physical write
    pub write_attempts: u8,
}

impl EngineConfig {
    /// Parse a configuration from TOML
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that cannot be clamped into range
    pub fn validate(&self) -> Result<()> {
        if self.write_attempts == 0 || self.write_attempts > MAX_WRITE_ATTEMPTS {
            return Err(WearError::InvalidWriteAttempts(self.write_attempts));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            base: 0,
            length: None,
            write_attempts: DEFAULT_WRITE_ATTEMPTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.base, 0);
        assert_eq!(config.length, None);
        assert_eq!(config.write_attempts, DEFAULT_WRITE_ATTEMPTS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = EngineConfig::from_toml_str("base = 50\nlength = 100\nwrite_attempts = 5\n").unwrap();
        assert_eq!(config.base, 50);
        assert_eq!(config.length, Some(100));
        assert_eq!(config.write_attempts, 5);
    }

    #[test]
    fn test_from_toml_fills_defaults() {
        let config = EngineConfig::from_toml_str("length = 64").unwrap();
        assert_eq!(config.base, 0);
        assert_eq!(config.length, Some(64));
        assert_eq!(config.write_attempts, DEFAULT_WRITE_ATTEMPTS);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = EngineConfig::from_toml_str("write_attempts = 0");
        assert!(matches!(result, Err(WearError::InvalidWriteAttempts(0))));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = EngineConfig::from_toml_str("retries = 3");
        assert!(matches!(result, Err(WearError::Config(_))));
    }
}

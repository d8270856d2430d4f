use thiserror::Error;

#[derive(Error, Debug)]
pub enum WearError {
    #[error("Raw store is empty: no bytes to reserve")]
    EmptyStore,

    #[error("Region of {total} bytes leaves no data slots (need at least 2 bytes)")]
    RegionTooSmall { total: usize },

    #[error("Invalid write attempts: {0} (must be between 1 and {})", crate::core::config::MAX_WRITE_ATTEMPTS)]
    InvalidWriteAttempts(u8),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WearError>;

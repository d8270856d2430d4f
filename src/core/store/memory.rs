//! Healthy in-memory medium

use super::RawStore;

/// In-memory medium whose cells never wear out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStore {
    bytes: Vec<u8>,
}

impl MemoryStore {
    /// Create a zero-filled medium of `size` bytes
    pub fn new(size: usize) -> Self {
        MemoryStore {
            bytes: vec![0u8; size],
        }
    }

    /// Wrap existing contents
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        MemoryStore { bytes }
    }

    /// Raw view of the whole medium
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl RawStore for MemoryStore {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn read(&self, addr: usize) -> u8 {
        self.bytes[addr]
    }

    fn write(&mut self, addr: usize, data: u8) {
        self.bytes[addr] = data;
    }
}

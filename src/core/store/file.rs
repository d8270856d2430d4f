//! File-backed medium
//!
//! Maps a file into memory and exposes each byte as one cell. The host's
//! storage does not wear the way an EEPROM does, so writes always persist.

use super::RawStore;
use crate::core::error::{Result, WearError};
use memmap2::MmapMut;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Memory-mapped file acting as a persistent byte medium
pub struct FileStore {
    map: MmapMut,
    file: File,
    path: PathBuf,
}

impl FileStore {
    /// Open `path` as a medium of exactly `size` bytes
    ///
    /// Creates the file if needed and grows it (zero-filled) to `size`.
    /// Existing contents within `size` are kept, so the retirement bitmap
    /// survives reopening.
    pub fn open<P: AsRef<Path>>(path: P, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(WearError::EmptyStore);
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        if file.metadata()?.len() < size as u64 {
            file.set_len(size as u64)?;
        }

        // SAFETY: the mapping is owned by this store and the file is not
        // resized while mapped.
        let map = unsafe { memmap2::MmapOptions::new().len(size).map_mut(&file)? };

        Ok(FileStore {
            map,
            file,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Get file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sync all writes to disk
    pub fn flush(&mut self) -> Result<()> {
        self.map.flush()?;
        self.file.sync_all()?;
        Ok(())
    }
}

impl RawStore for FileStore {
    fn len(&self) -> usize {
        self.map.len()
    }

    fn read(&self, addr: usize) -> u8 {
        self.map[addr]
    }

    fn write(&mut self, addr: usize, data: u8) {
        self.map[addr] = data;
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .field("len", &self.map.len())
            .finish()
    }
}

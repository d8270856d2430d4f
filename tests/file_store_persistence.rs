//! File-backed medium tests
//!
//! The region, its data and its retirement bitmap must survive closing and
//! reopening the backing file.

use robust_eeprom::{EngineBuilder, EngineConfig, FileStore, RawStore, WearError, WearLevelingEngine};
use tempfile::TempDir;

#[test]
fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("eeprom.bin");

    {
        let mut engine = EngineBuilder::new()
            .base(50)
            .length(100)
            .build(FileStore::open(&path, 256).unwrap())
            .unwrap();
        engine.full_reset();
        for v in 0..20 {
            engine.write(v, v as u8 + 1);
        }
        engine.store_mut().flush().unwrap();
    }

    let engine = EngineBuilder::new()
        .base(50)
        .length(100)
        .build(FileStore::open(&path, 256).unwrap())
        .unwrap();
    assert_eq!(engine.net_length(), 88);
    for v in 0..20 {
        assert_eq!(engine.read(v), v as u8 + 1);
    }
}

#[test]
fn test_retirement_bits_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bitmap.bin");

    {
        let mut engine = WearLevelingEngine::with_store(FileStore::open(&path, 90).unwrap()).unwrap();
        engine.full_reset();
        // Mark slots 0 and 9 retired directly in the bitmap
        let first = engine.region().control_addr(0);
        let second = engine.region().control_addr(1);
        engine.store_mut().write(first, 0b0000_0001);
        engine.store_mut().write(second, 0b0000_0010);
        engine.store_mut().flush().unwrap();
    }

    let engine = WearLevelingEngine::with_store(FileStore::open(&path, 90).unwrap()).unwrap();
    assert_eq!(engine.net_length(), 78);
    assert!(engine.is_retired(0));
    assert!(engine.is_retired(9));
    assert_eq!(engine.physical_byte(0), 1);
    assert_eq!(engine.physical_byte(8), 10);
}

#[test]
fn test_open_grows_file_to_size() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("grow.bin");
    std::fs::write(&path, [0xFFu8; 10]).unwrap();

    let store = FileStore::open(&path, 64).unwrap();
    assert_eq!(store.len(), 64);
    assert_eq!(store.read(0), 0xFF);
    assert_eq!(store.read(63), 0);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 64);
}

#[test]
fn test_empty_file_store_is_rejected() {
    let dir = TempDir::new().unwrap();
    let result = FileStore::open(dir.path().join("empty.bin"), 0);
    assert!(matches!(result, Err(WearError::EmptyStore)));
}

#[test]
fn test_config_from_toml_drives_file_region() {
    let dir = TempDir::new().unwrap();
    let config = EngineConfig::from_toml_str("base = 32\nlength = 45\nwrite_attempts = 5").unwrap();

    let mut engine = WearLevelingEngine::new(
        FileStore::open(dir.path().join("cfg.bin"), 128).unwrap(),
        config,
    )
    .unwrap();
    engine.full_reset();

    assert_eq!(engine.region().base(), 32);
    assert_eq!(engine.data_length(), 40);
    assert_eq!(engine.control_length(), 5);
    assert_eq!(engine.write_attempts(), 5);

    engine.write(0, 0x77);
    assert_eq!(engine.store().read(32), 0x77);
}

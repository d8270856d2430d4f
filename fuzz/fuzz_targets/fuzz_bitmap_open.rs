#![no_main]
use libfuzzer_sys::fuzz_target;
use robust_eeprom::{MemoryStore, WearLevelingEngine};

// Arbitrary medium contents as an unformatted bitmap: translation must stay in bounds
fuzz_target!(|data: &[u8]| {
    let engine = match WearLevelingEngine::with_store(MemoryStore::from_bytes(data.to_vec())) {
        Ok(engine) => engine,
        Err(_) => return,
    };

    let data_len = engine.data_length();
    for v in 0..engine.net_length() {
        let addr = engine.physical_byte(v);
        assert!(addr < data_len);
        assert!(!engine.is_retired(addr));
        let _ = engine.read(v);
    }
    let _ = engine.physical_byte(usize::MAX);
});

#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use robust_eeprom::{EngineBuilder, FaultyStore, WriteStatus};
use std::collections::HashMap;

#[derive(Debug, Arbitrary)]
enum Op {
    Write { offset: u8, value: u8 },
    Update { offset: u8, value: u8 },
    Read { offset: u8 },
    Reset,
}

#[derive(Debug, Arbitrary)]
struct Input {
    seed: u64,
    base: u8,
    length: u8,
    endurance: u8,
    ops: Vec<Op>,
}

// Random operations against a wearing medium; committed values must never be lost
fuzz_target!(|input: Input| {
    let min = u32::from(input.endurance % 32) + 10;
    let store = FaultyStore::with_endurance(256, min..=min + 20, input.seed);
    let mut engine = match EngineBuilder::new()
        .base(input.base as usize)
        .length(input.length as usize)
        .build(store)
    {
        Ok(engine) => engine,
        Err(_) => return,
    };
    engine.full_reset();

    let mut model: HashMap<usize, u8> = HashMap::new();
    for op in input.ops {
        match op {
            // Out-of-range writes are clamped, which the model does not follow
            Op::Write { offset, .. } | Op::Update { offset, .. }
                if offset as usize >= engine.net_length() => {}
            Op::Write { offset, value } => {
                if engine.write(offset as usize, value) == WriteStatus::Depleted {
                    return;
                }
                model.insert(offset as usize, value);
            }
            Op::Update { offset, value } => {
                if engine.update(offset as usize, value) == WriteStatus::Depleted {
                    return;
                }
                model.insert(offset as usize, value);
            }
            Op::Read { offset } => {
                if let Some(&expected) = model.get(&(offset as usize)) {
                    assert_eq!(engine.read(offset as usize), expected);
                }
            }
            Op::Reset => {
                engine.full_reset();
                model.clear();
            }
        }

        let stats = engine.stats();
        assert!(stats.net <= stats.data);
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use loglog_sketch::{CardinalitySketch, Sketch};
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let split_index = wyhash(data, 0) as usize % data.len();
    let (first_half, second_half) = data.split_at(split_index);

    let mut sketch1 = Sketch::new(2_000_000, 0.05).unwrap();
    for chunk in first_half.chunks(4) {
        sketch1.add(chunk);
        assert!(!sketch1.is_empty());
        assert!(sketch1.estimate() > 0.0);
    }

    let mut sketch2 = Sketch::new(2_000_000, 0.05).unwrap();
    for chunk in second_half.chunks(4) {
        sketch2.add(chunk);
        assert!(sketch2.estimate() > 0.0);
    }

    let merged = sketch1.merge(&sketch2).unwrap();
    assert!(merged.estimate() >= sketch1.estimate());
    assert!(merged.estimate() >= sketch2.estimate());
    assert_eq!(merged, sketch2.merge(&sketch1).unwrap());
});

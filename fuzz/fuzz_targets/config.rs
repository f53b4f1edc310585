#![no_main]

use libfuzzer_sys::fuzz_target;
use loglog_sketch::{CardinalitySketch, Sketch, SketchConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(config) = serde_json::from_slice::<SketchConfig>(data) else {
        return;
    };
    // keep bucket arrays small
    if config.error_rate < 0.005 {
        return;
    }
    if let Ok(mut sketch) = Sketch::new(config.max_cardinality, config.error_rate) {
        sketch.add(data);
        assert!(sketch.estimate() > 0.0);
        assert!(sketch.bucket_width() >= 1);
        assert_eq!(sketch.bucket_count(), 1 << sketch.index_bits());
    }
});

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use loglog_sketch::{CardinalitySketch, Sketch};
use tabled::{
    settings::{Settings, Style},
    Table, Tabled,
};

#[derive(Tabled)]
struct Record {
    max_cardinality: u64,
    error_rate: f64,
    sketch: &'static str,
    buckets: usize,
    bucket_width: u8,
    size_in_bits: usize,
    size_of: usize,
    heap: String,
}

/// Build sketch, insert `n` distinct items and return it with a
/// "bytes / blocks allocated after construction" summary.
fn measure_memory_usage(n: u64, create: impl Fn() -> Sketch) -> (Sketch, String) {
    let _profiler = dhat::Profiler::builder().testing().build();
    let mut sketch = create();
    let created = dhat::HeapStats::get();
    for i in 0..n {
        sketch.add(&i.to_le_bytes());
    }
    let stats = dhat::HeapStats::get();

    // inserts must not touch the heap
    assert_eq!(stats.total_blocks, created.total_blocks);
    assert_eq!(stats.curr_bytes, created.curr_bytes);

    let heap = format!("{} / {}", stats.total_bytes, stats.total_blocks);
    (sketch, heap)
}

#[test]
fn test_allocations() {
    let configs = [
        (1_000, 0.1),
        (2_000_000, 0.05),
        (1_000_000_000, 0.01),
        (u64::MAX, 0.005),
    ];

    let mut results = vec![];
    for (max_cardinality, error_rate) in configs {
        for hll in [false, true] {
            let (sketch, heap) = measure_memory_usage(100_000, || {
                if hll {
                    Sketch::hyperloglog(max_cardinality, error_rate).unwrap()
                } else {
                    Sketch::new(max_cardinality, error_rate).unwrap()
                }
            });

            assert_eq!(
                sketch.size_in_bits(),
                sketch.bucket_count() * usize::from(sketch.bucket_width())
            );
            assert!(sketch.size_of() * 8 >= sketch.size_in_bits());

            results.push(Record {
                max_cardinality,
                error_rate,
                sketch: sketch.name(),
                buckets: sketch.bucket_count(),
                bucket_width: sketch.bucket_width(),
                size_in_bits: sketch.size_in_bits(),
                size_of: sketch.size_of(),
                heap,
            });
        }
    }

    let table_config = Settings::default().with(Style::markdown());
    let markdown = Table::new(results).with(table_config).to_string();
    println!("{}", markdown);
}

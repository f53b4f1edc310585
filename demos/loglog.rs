use loglog_sketch::{CardinalitySketch, Sketch};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut sketch1 = Sketch::new(2_000_000, 0.05).unwrap();
    for i in 0..10 {
        sketch1.add(i.to_string().as_bytes());
    }
    println!("sketch1 estimate = {:.2}", sketch1.estimate());

    let mut sketch2 = Sketch::new(2_000_000, 0.05).unwrap();
    for i in 10..10_000 {
        sketch2.add(i.to_string().as_bytes());
    }
    println!("sketch2 estimate = {:.2}", sketch2.estimate());

    sketch1.merge_into(&sketch2).unwrap();
    println!("merged estimate = {:.2}", sketch1.estimate());
    println!("merged sketch = {:?}", sketch1);

    let mut hll = Sketch::hyperloglog(2_000_000, 0.05).unwrap();
    for i in 0..10 {
        hll.add(i.to_string().as_bytes());
    }
    println!("hyperloglog estimate = {:.2}", hll.estimate());
}

//! `loglog-sketch` estimates the number of distinct items in a stream or dataset
//! using a fixed amount of memory.
//!
//! The sketch follows the LogLog algorithm: items are hashed, routed to one of `m`
//! buckets by the leading digest bits and each bucket remembers the highest rank
//! (position of the first set bit) seen among its items. Sketches with the same
//! layout merge by bucket-wise maximum, which makes counting across shards or
//! machines straightforward.
//!
//! ```
//! use loglog_sketch::{CardinalitySketch, Sketch};
//!
//! let mut lhs = Sketch::new(2_000_000, 0.05).unwrap();
//! let mut rhs = Sketch::new(2_000_000, 0.05).unwrap();
//! for i in 0..5_000 {
//!     lhs.add(format!("user-{}", i).as_bytes());
//!     rhs.add(format!("user-{}", i + 2_500).as_bytes());
//! }
//! let union = lhs.merge(&rhs).unwrap();
//! assert!(union.estimate() > lhs.estimate());
//! ```
mod beta;
pub mod buckets;
pub mod config;
pub mod error;
pub mod estimator;
pub mod hash;
pub mod observer;
pub mod projector;
pub mod rank;
pub mod shard;
pub mod sketch;

pub use config::SketchConfig;
pub use error::{ConfigurationError, Incompatibility, SketchError};
pub use estimator::{Estimator, HyperLogLog, LogLog};
pub use hash::{HashProvider, Sha1Hasher, WyHasher};
pub use observer::{SketchObserver, TracingObserver};
pub use shard::{count_sharded, merge_all, SharedSketch};
pub use sketch::{CardinalitySketch, Sketch};

//! Cardinality sketch allows to estimate number of distinct items in a stream
//! and is defined by two runtime parameters:
//! - `max_cardinality`: largest expected number of distinct items, which defines
//!   the bucket width `W = ceil(log2(log2(max_cardinality)))` bits.
//! - `error_rate`: desired relative error, which defines the number of buckets
//!   `m = 2^k` with `k = round(log2((c / error_rate)^2))`.
//!
//! # Algorithm
//!
//! Every item is hashed into a fixed-width digest. The first `k` digest bits select a
//! bucket, the position of the leftmost set bit in the remaining bits is the rank of
//! the item. Each bucket keeps the maximum rank routed to it, so the whole state is
//! `m` small integers which only ever grow.
//!
//! # Memory
//!
//! For `max_cardinality = 2_000_000` and `error_rate = 0.05` the LogLog sketch uses
//! 512 buckets of 5 bits: 2560 bits of bucket state.
//!
//! # Merging
//!
//! Bucket updates are commutative and idempotent, so two sketches with the same
//! layout and hash provider merge by bucket-wise maximum into the sketch of the union
//! of their items. Building one sketch per shard of the input and merging them
//! afterwards gives exactly the same buckets as a single sketch over all the input.

use std::fmt::{Debug, Formatter};
use std::mem::size_of;
use std::sync::Arc;

use tracing::debug;

use crate::buckets::BucketArray;
use crate::config::SketchConfig;
use crate::error::{Incompatibility, SketchError};
use crate::estimator::{Estimator, EstimatorTrait, HyperLogLog, LogLog};
use crate::hash::{HashProvider, Sha1Hasher};
use crate::observer::SketchObserver;
use crate::projector::HashProjector;
use crate::rank::RankCalculator;

/// Operations shared by all cardinality sketches.
pub trait CardinalitySketch: Clone {
    /// Insert an item
    fn add(&mut self, item: &[u8]);

    /// Return cardinality estimate. Does not modify the sketch.
    fn estimate(&self) -> f64;

    /// Merge `other` into `self`
    fn merge_into(&mut self, other: &Self) -> Result<(), SketchError>;

    /// Return new sketch representing the union of `self` and `other`
    fn merge(&self, other: &Self) -> Result<Self, SketchError> {
        let mut merged = self.clone();
        merged.merge_into(other)?;
        Ok(merged)
    }

    /// Size of the sketch state in bits
    fn size_in_bits(&self) -> usize;

    /// Label of the sketch variant
    fn name(&self) -> &'static str;
}

/// LogLog-family cardinality sketch over digests of hash provider `H`.
#[derive(Clone)]
pub struct Sketch<H: HashProvider = Sha1Hasher> {
    config: SketchConfig,
    estimator: Estimator,
    projector: HashProjector<H>,
    ranks: RankCalculator,
    buckets: BucketArray,
    observer: Option<Arc<dyn SketchObserver>>,
}

impl Sketch {
    /// Creates new LogLog sketch hashing items with SHA-1
    pub fn new(max_cardinality: u64, error_rate: f64) -> Result<Self, SketchError> {
        Self::with_hasher(
            SketchConfig::new(max_cardinality, error_rate)?,
            LogLog.into(),
            Sha1Hasher,
        )
    }

    /// Creates new HyperLogLog sketch hashing items with SHA-1
    pub fn hyperloglog(max_cardinality: u64, error_rate: f64) -> Result<Self, SketchError> {
        Self::with_hasher(
            SketchConfig::new(max_cardinality, error_rate)?,
            HyperLogLog.into(),
            Sha1Hasher,
        )
    }
}

impl<H: HashProvider + Default> Sketch<H> {
    /// Creates new sketch from `config` using default instance of `H`
    pub fn from_config(config: SketchConfig, estimator: Estimator) -> Result<Self, SketchError> {
        Self::with_hasher(config, estimator, H::default())
    }
}

impl<H: HashProvider> Sketch<H> {
    /// Creates new sketch from `config` with given estimator and hash provider
    pub fn with_hasher(
        config: SketchConfig,
        estimator: Estimator,
        hasher: H,
    ) -> Result<Self, SketchError> {
        config.validate()?;
        let index_bits = config.index_bits(estimator.coefficient())?;
        estimator.check_index_bits(index_bits)?;
        let projector = HashProjector::new(hasher, index_bits)?;
        let bucket_width = config.bucket_width();
        let buckets = BucketArray::new(1 << index_bits, bucket_width);

        debug!(
            sketch = estimator.name(),
            max_cardinality = config.max_cardinality,
            error_rate = config.error_rate,
            buckets = buckets.len(),
            bucket_width,
            "created sketch"
        );

        Ok(Self {
            config,
            estimator,
            projector,
            ranks: RankCalculator::new(bucket_width),
            buckets,
            observer: None,
        })
    }

    /// Attach observer notified about bucket updates and merges
    pub fn with_observer(mut self, observer: Arc<dyn SketchObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    #[inline]
    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    #[inline]
    pub fn estimator(&self) -> Estimator {
        self.estimator
    }

    #[inline]
    pub fn hasher(&self) -> &H {
        self.projector.hasher()
    }

    /// Number of buckets `m`
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Bits per bucket
    #[inline]
    pub fn bucket_width(&self) -> u8 {
        self.buckets.width()
    }

    /// Number of digest bits selecting the bucket, `log2(m)`
    #[inline]
    pub fn index_bits(&self) -> u32 {
        self.projector.index_bits()
    }

    /// Iterate over bucket values
    pub fn buckets(&self) -> impl ExactSizeIterator<Item = u8> + '_ {
        self.buckets.iter()
    }

    /// Return whether no item has been inserted (or merged in) since creation or `clear`
    pub fn is_empty(&self) -> bool {
        self.buckets.zeros() == self.buckets.len()
    }

    /// Reset sketch to its empty state, keeping its configuration
    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Return memory size of `Sketch` in bytes
    pub fn size_of(&self) -> usize {
        size_of::<Self>() - size_of::<BucketArray>() + self.buckets.size_of()
    }

    /// Check whether `other` can be merged into `self`
    pub fn check_compatible(&self, other: &Self) -> Result<(), Incompatibility> {
        if self.bucket_count() != other.bucket_count() {
            return Err(Incompatibility::BucketCount {
                lhs: self.bucket_count(),
                rhs: other.bucket_count(),
            });
        }
        if self.bucket_width() != other.bucket_width() {
            return Err(Incompatibility::BucketWidth {
                lhs: self.bucket_width(),
                rhs: other.bucket_width(),
            });
        }
        if self.hasher() != other.hasher() {
            return Err(Incompatibility::HashProvider);
        }
        Ok(())
    }
}

impl<H: HashProvider> CardinalitySketch for Sketch<H> {
    #[inline]
    fn add(&mut self, item: &[u8]) {
        let (index, remainder) = self.projector.project(item);
        let raw_rank = RankCalculator::raw_rank(&remainder);
        let rank = self.ranks.clamp(raw_rank);
        let old = self.buckets.raise(index, rank);

        if let Some(observer) = &self.observer {
            if raw_rank > u32::from(rank) {
                observer.rank_clamped(index, raw_rank, rank);
            }
            if let Some(old) = old {
                observer.bucket_raised(index, old, rank);
            }
        }
    }

    #[inline]
    fn estimate(&self) -> f64 {
        self.estimator.estimate(&self.buckets)
    }

    fn merge_into(&mut self, other: &Self) -> Result<(), SketchError> {
        self.check_compatible(other)?;
        let raised = self.buckets.merge(&other.buckets)?;
        debug!(sketch = self.name(), raised, "merged sketch");
        if let Some(observer) = &self.observer {
            observer.merged(raised);
        }
        Ok(())
    }

    #[inline]
    fn size_in_bits(&self) -> usize {
        self.buckets.size_in_bits()
    }

    #[inline]
    fn name(&self) -> &'static str {
        self.estimator.name()
    }
}

impl<H: HashProvider> PartialEq for Sketch<H> {
    /// Compare sketch layouts and bucket values, ignoring observers
    fn eq(&self, rhs: &Self) -> bool {
        self.config == rhs.config
            && self.estimator == rhs.estimator
            && self.projector == rhs.projector
            && self.buckets == rhs.buckets
    }
}

impl<H: HashProvider> Debug for Sketch<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ name: {}, estimate: {:.2}, size: {} }}",
            self.name(),
            self.estimate(),
            self.size_in_bits()
        )
    }
}

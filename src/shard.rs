//! Counting across threads.
//!
//! The preferred way to scale is sharding: every worker owns a sketch over a disjoint
//! part of the input and the sketches are merged once all workers are done. Because
//! bucket updates commute, the merged sketch is bucket-equal to a sketch built
//! sequentially over the whole input.
//!
//! [`SharedSketch`] covers the remaining case of several threads inserting into one
//! sketch. A single lock guards every read-modify-write; estimates taken while other
//! threads insert observe some prefix of the concurrent inserts.

use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::debug;

use crate::error::SketchError;
use crate::sketch::CardinalitySketch;

/// Merge all `sketches` into the first one.
/// Returns `None` when there are no sketches.
pub fn merge_all<S, I>(sketches: I) -> Result<Option<S>, SketchError>
where
    S: CardinalitySketch,
    I: IntoIterator<Item = S>,
{
    let mut sketches = sketches.into_iter();
    let Some(mut merged) = sketches.next() else {
        return Ok(None);
    };
    for sketch in sketches {
        merged.merge_into(&sketch)?;
    }
    Ok(Some(merged))
}

/// Count every partition on the rayon thread pool and merge the results.
///
/// Each partition is inserted into its own clone of `template`, which is normally an
/// empty sketch; items already in `template` are part of the result.
pub fn count_sharded<S, P, T>(template: &S, partitions: &[P]) -> Result<S, SketchError>
where
    S: CardinalitySketch + Send + Sync,
    P: AsRef<[T]> + Sync,
    T: AsRef<[u8]>,
{
    debug!(shards = partitions.len(), "counting shards");
    partitions
        .par_iter()
        .map(|partition| {
            let mut sketch = template.clone();
            for item in partition.as_ref() {
                sketch.add(item.as_ref());
            }
            Ok(sketch)
        })
        .try_reduce(
            || template.clone(),
            |mut lhs, rhs| {
                lhs.merge_into(&rhs)?;
                Ok(lhs)
            },
        )
}

/// Sketch shared between threads behind a lock.
#[derive(Debug)]
pub struct SharedSketch<S> {
    inner: Mutex<S>,
}

impl<S: CardinalitySketch> SharedSketch<S> {
    pub fn new(sketch: S) -> Self {
        Self {
            inner: Mutex::new(sketch),
        }
    }

    /// Insert an item
    pub fn add(&self, item: &[u8]) {
        self.inner.lock().add(item);
    }

    /// Return cardinality estimate of the current state
    pub fn estimate(&self) -> f64 {
        self.inner.lock().estimate()
    }

    /// Merge `other` into the shared sketch
    pub fn merge_from(&self, other: &S) -> Result<(), SketchError> {
        self.inner.lock().merge_into(other)
    }

    /// Return copy of the current state
    pub fn snapshot(&self) -> S {
        self.inner.lock().clone()
    }

    pub fn into_inner(self) -> S {
        self.inner.into_inner()
    }
}

impl<S: CardinalitySketch> From<S> for SharedSketch<S> {
    fn from(sketch: S) -> Self {
        Self::new(sketch)
    }
}

//! Hooks for observing sketch updates.
//!
//! `add` never logs on its own. Attach an observer with
//! [`Sketch::with_observer`](crate::Sketch::with_observer) to count or trace updates.

use tracing::trace;

/// Callbacks invoked by a sketch while it is updated. All methods default to no-ops.
pub trait SketchObserver: Send + Sync {
    /// Bucket `index` was raised from `old` to `new` by an inserted item.
    fn bucket_raised(&self, _index: usize, _old: u8, _new: u8) {}

    /// Rank `raw_rank` computed for bucket `index` did not fit the bucket width
    /// and was stored as `max_rank`.
    fn rank_clamped(&self, _index: usize, _raw_rank: u32, _max_rank: u8) {}

    /// Another sketch was merged in, raising `raised` buckets.
    fn merged(&self, _raised: usize) {}
}

/// Observer emitting every callback as a `tracing` event at trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SketchObserver for TracingObserver {
    fn bucket_raised(&self, index: usize, old: u8, new: u8) {
        trace!(index, old, new, "bucket raised");
    }

    fn rank_clamped(&self, index: usize, raw_rank: u32, max_rank: u8) {
        trace!(index, raw_rank, max_rank, "rank clamped");
    }

    fn merged(&self, raised: usize) {
        trace!(raised, "sketch merged");
    }
}

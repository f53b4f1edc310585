//! Errors returned by sketch construction and merging.
//!
//! Only two operations can fail: building a sketch from invalid parameters and
//! merging two sketches whose bucket layouts differ. Inserting and estimating
//! never fail.

use thiserror::Error;

/// Top-level error type of the crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SketchError {
    /// Sketch parameters are invalid. Only raised at construction time.
    #[error("invalid sketch configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    /// Sketches cannot be merged because their layouts differ.
    #[error("incompatible sketches: {0}")]
    IncompatibleSketch(#[from] Incompatibility),
}

/// Reason a sketch configuration was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("error rate {0} is outside of (0, 1)")]
    ErrorRateOutOfRange(f64),
    #[error("max cardinality {0} must be greater than 1")]
    MaxCardinalityTooSmall(u64),
    #[error("{index_bits} index bits leave no remainder in a {digest_bits}-bit digest")]
    IndexBitsExceedDigest { index_bits: u32, digest_bits: u32 },
    #[error("{index_bits} index bits exceed the supported maximum of {max}")]
    TooManyBuckets { index_bits: u32, max: u32 },
    #[error("precision {precision} is outside of [{min}, {max}] supported by the estimator")]
    PrecisionOutOfRange { precision: u32, min: u32, max: u32 },
}

/// Reason two sketches could not be merged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Incompatibility {
    #[error("bucket count {lhs} differs from {rhs}")]
    BucketCount { lhs: usize, rhs: usize },
    #[error("bucket width {lhs} differs from {rhs}")]
    BucketWidth { lhs: u8, rhs: u8 },
    #[error("items were hashed by different hash providers")]
    HashProvider,
}

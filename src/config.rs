//! Sketch parameters and the sizing math derived from them.
//!
//! A sketch is configured with two numbers:
//! - `max_cardinality`: the largest number of distinct items the sketch is expected
//!   to count. It defines the bucket width as `ceil(log2(log2(max_cardinality)))` bits.
//! - `error_rate`: the desired relative error in `(0, 1)`. It defines the number of
//!   index bits `k = round(log2((c / error_rate)^2))`, where `c` is the estimator's
//!   standard error coefficient (1.30 for LogLog, 1.04 for HyperLogLog).

use crate::error::ConfigurationError;

/// Upper bound on index bits, i.e. at most 2^26 buckets per sketch.
pub const MAX_INDEX_BITS: u32 = 26;

/// Immutable parameters of a sketch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "with_serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SketchConfig {
    /// Maximum expected number of distinct items
    pub max_cardinality: u64,
    /// Desired relative error, exclusive `(0, 1)`
    pub error_rate: f64,
}

impl SketchConfig {
    /// Creates validated sketch parameters.
    pub fn new(max_cardinality: u64, error_rate: f64) -> Result<Self, ConfigurationError> {
        let config = Self {
            max_cardinality,
            error_rate,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the parameters. Configurations built by hand or deserialized
    /// are validated again when a sketch is created from them.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        // written as a negation so that NaN is rejected too
        if !(self.error_rate > 0.0 && self.error_rate < 1.0) {
            return Err(ConfigurationError::ErrorRateOutOfRange(self.error_rate));
        }
        // log2(log2(n)) is undefined or negative for n <= 1
        if self.max_cardinality <= 1 {
            return Err(ConfigurationError::MaxCardinalityTooSmall(
                self.max_cardinality,
            ));
        }
        Ok(())
    }

    /// Number of bucket index bits `k` for the given standard error coefficient.
    #[inline]
    pub fn index_bits(&self, coefficient: f64) -> Result<u32, ConfigurationError> {
        let k = (coefficient / self.error_rate).powi(2).log2().round();
        if !(k <= f64::from(MAX_INDEX_BITS)) {
            return Err(ConfigurationError::TooManyBuckets {
                index_bits: k as u32,
                max: MAX_INDEX_BITS,
            });
        }
        Ok((k as u32).max(1))
    }

    /// Width of every bucket in bits, at least 1 and at most 6 (for `u64::MAX`).
    #[inline]
    pub fn bucket_width(&self) -> u8 {
        let width = (self.max_cardinality as f64).log2().log2().ceil();
        (width as u8).max(1)
    }
}

//! Estimator formulas turning bucket values into a cardinality estimate.
//!
//! Both estimators read the same bucket layout (maximum rank per bucket), so they can
//! be swapped without touching hashing, bucketing or merging.
//!
//! ## LogLog
//! `E = alpha * m * 2^(sum(M_j) / m)` with the asymptotic constant `alpha = 0.39701`
//! from the Durand-Flajolet LogLog paper, and standard error `1.30 / sqrt(m)`.
//!
//! The constant is only exact for large `m` and for cardinalities well above `m`:
//! - an empty sketch estimates `0.39701 * m` rather than 0,
//! - below a few times `m` distinct items the estimate is dominated by that floor,
//! - for `m <= 64` the constant itself is biased by several percent.
//!
//! These properties are left as they are; use [`HyperLogLog`] where small
//! cardinalities matter.
//!
//! ## HyperLogLog
//! Harmonic mean of bucket values with LogLog-Beta bias correction:
//! `E = alpha(m) * m * (m - z) / (sum(2^-M_j) + beta(z))` where `z` is the number of
//! zero buckets. Standard error is `1.04 / sqrt(m)` and an empty sketch estimates 0.
//! Requires `m` in `[2^4, 2^18]`, the range covered by the LogLog-Beta coefficients.
//!
//! LogLog-Beta paper: https://arxiv.org/pdf/1612.02284.pdf

use enum_dispatch::enum_dispatch;

use crate::beta::{beta_horner, MAX_PRECISION, MIN_PRECISION};
use crate::buckets::BucketArray;
use crate::error::ConfigurationError;

/// Asymptotic LogLog bias correction constant
pub const LOGLOG_ALPHA: f64 = 0.39701;

/// Estimator variants supported by [`Sketch`](crate::Sketch)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[enum_dispatch]
pub enum Estimator {
    LogLog(LogLog),
    HyperLogLog(HyperLogLog),
}

/// Estimator trait which must be implemented by all estimator variants.
#[enum_dispatch(Estimator)]
pub(crate) trait EstimatorTrait {
    /// Label of the sketch variant using this estimator
    fn name(&self) -> &'static str;
    /// Standard error coefficient `c` in `c / sqrt(m)`, used for sizing
    fn coefficient(&self) -> f64;
    /// Check that the estimator supports `2^index_bits` buckets
    fn check_index_bits(&self, index_bits: u32) -> Result<(), ConfigurationError>;
    /// Compute cardinality estimate from bucket values
    fn estimate(&self, buckets: &BucketArray) -> f64;
}

/// Durand-Flajolet LogLog estimator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogLog;

impl EstimatorTrait for LogLog {
    fn name(&self) -> &'static str {
        "LogLogSketch"
    }

    fn coefficient(&self) -> f64 {
        1.30
    }

    fn check_index_bits(&self, _index_bits: u32) -> Result<(), ConfigurationError> {
        Ok(())
    }

    #[inline]
    fn estimate(&self, buckets: &BucketArray) -> f64 {
        let m = buckets.len() as f64;
        LOGLOG_ALPHA * m * (buckets.sum() as f64 / m).exp2()
    }
}

/// HyperLogLog estimator with LogLog-Beta bias correction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HyperLogLog;

impl EstimatorTrait for HyperLogLog {
    fn name(&self) -> &'static str {
        "HyperLogLogSketch"
    }

    fn coefficient(&self) -> f64 {
        1.04
    }

    fn check_index_bits(&self, index_bits: u32) -> Result<(), ConfigurationError> {
        if (MIN_PRECISION..=MAX_PRECISION).contains(&index_bits) {
            Ok(())
        } else {
            Err(ConfigurationError::PrecisionOutOfRange {
                precision: index_bits,
                min: MIN_PRECISION,
                max: MAX_PRECISION,
            })
        }
    }

    #[inline]
    fn estimate(&self, buckets: &BucketArray) -> f64 {
        let m = buckets.len();
        let (zeros, sum) = buckets.iter().fold((0usize, 0.0f64), |(zeros, sum), rank| {
            (zeros + usize::from(rank == 0), sum + (-f64::from(rank)).exp2())
        });
        if zeros == m {
            return 0.0;
        }
        let precision = m.trailing_zeros();
        let estimate = alpha(m) * ((m * (m - zeros)) as f64)
            / (sum + beta_horner(zeros as f64, precision));
        estimate.max(0.0)
    }
}

/// Parameter for bias correction
#[inline]
fn alpha(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / (m as f64)),
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use test_case::test_case;

    fn buckets_with(len: usize, width: u8, value: u8) -> BucketArray {
        let mut buckets = BucketArray::new(len, width);
        for idx in 0..len {
            buckets.set(idx, value);
        }
        buckets
    }

    #[test_case(Estimator::from(LogLog) => "LogLogSketch")]
    #[test_case(Estimator::from(HyperLogLog) => "HyperLogLogSketch")]
    fn test_name(estimator: Estimator) -> &'static str {
        estimator.name()
    }

    #[test]
    fn test_loglog_estimate() {
        let estimator = Estimator::LogLog(LogLog);
        let empty = BucketArray::new(512, 5);
        assert_eq!(estimator.estimate(&empty), LOGLOG_ALPHA * 512.0);

        // every bucket at rank 4: 0.39701 * 512 * 2^4
        let buckets = buckets_with(512, 5, 4);
        let estimate = estimator.estimate(&buckets);
        assert!((estimate - LOGLOG_ALPHA * 512.0 * 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_hyperloglog_estimate() {
        let estimator = Estimator::HyperLogLog(HyperLogLog);
        assert_eq!(estimator.estimate(&BucketArray::new(512, 5)), 0.0);

        let mut buckets = BucketArray::new(512, 5);
        buckets.set(7, 1);
        let estimate = estimator.estimate(&buckets);
        assert!(estimate > 0.5 && estimate < 1.5, "estimate = {}", estimate);

        let estimate = estimator.estimate(&buckets_with(512, 5, 31));
        assert!(estimate.is_finite() && estimate > 0.0);
    }

    #[test_case(3 => false)]
    #[test_case(4 => true)]
    #[test_case(9 => true)]
    #[test_case(18 => true)]
    #[test_case(19 => false)]
    fn test_hyperloglog_precision(index_bits: u32) -> bool {
        HyperLogLog.check_index_bits(index_bits).is_ok()
    }

    #[test]
    fn test_alpha() {
        assert_eq!(alpha(16), 0.673);
        assert!((alpha(4096) - 0.7213 / (1.0 + 1.079 / 4096.0)).abs() < f64::EPSILON);
    }
}

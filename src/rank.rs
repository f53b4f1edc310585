//! Rank of remainder bits: 1-based position of the leftmost set bit.
//!
//! A remainder without any set bit has rank `width + 1`, one past its last bit. This
//! is a legitimate outcome whose probability halves with every extra digest bit.
//!
//! Ranks are clamped to `2^W - 1` for `W`-bit buckets. For the default SHA-1 digest
//! raw ranks can reach 160, far above what a 5 or 6 bit bucket can hold; such ranks
//! are capped instead of widening the bucket or overflowing it. The cap only affects
//! remainders starting with at least `2^W - 1` zero bits.

use crate::projector::Remainder;

/// Computes bucket-sized ranks of remainder bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankCalculator {
    max_rank: u8,
}

impl RankCalculator {
    /// Creates rank calculator for buckets of `bucket_width` bits (1 to 8).
    #[inline]
    pub fn new(bucket_width: u8) -> Self {
        let width = bucket_width.clamp(1, 8);
        Self {
            max_rank: u8::MAX >> (8 - width),
        }
    }

    /// Largest rank a bucket can hold
    #[inline]
    pub fn max_rank(&self) -> u8 {
        self.max_rank
    }

    /// Unclamped rank of `remainder`
    #[inline]
    pub fn raw_rank<D: AsRef<[u8]>>(remainder: &Remainder<D>) -> u32 {
        // `leading_zeros` equals the width for all-zero remainders
        remainder.leading_zeros() as u32 + 1
    }

    /// Clamp raw rank to the bucket range
    #[inline]
    pub fn clamp(&self, raw_rank: u32) -> u8 {
        raw_rank.min(u32::from(self.max_rank)) as u8
    }

    /// Rank of `remainder` clamped to the bucket range
    #[inline]
    pub fn rank<D: AsRef<[u8]>>(&self, remainder: &Remainder<D>) -> u8 {
        self.clamp(Self::raw_rank(remainder))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(1 => 1)]
    #[test_case(3 => 7)]
    #[test_case(5 => 31)]
    #[test_case(6 => 63)]
    #[test_case(8 => 255)]
    fn test_max_rank(bucket_width: u8) -> u8 {
        RankCalculator::new(bucket_width).max_rank()
    }

    #[test_case([0x80, 0], 0 => 1; "first bit set")]
    #[test_case([0x01, 0], 0 => 8; "last bit of first byte")]
    #[test_case([0x00, 0x01], 0 => 16; "last bit")]
    #[test_case([0xf0, 0x20], 4 => 7; "after offset")]
    #[test_case([0x00, 0x00], 0 => 17; "all zero")]
    #[test_case([0xff, 0x00], 9 => 8; "all zero after offset")]
    fn test_raw_rank(digest: [u8; 2], offset: usize) -> u32 {
        RankCalculator::raw_rank(&Remainder::new(digest, offset))
    }

    #[test]
    fn test_all_zero_remainder_clamped() {
        // 160-bit digest with 9 index bits leaves 151 zero bits, rank 152
        let remainder = Remainder::new([0u8; 20], 9);
        assert_eq!(RankCalculator::raw_rank(&remainder), 152);

        let ranks = RankCalculator::new(5);
        assert_eq!(ranks.rank(&remainder), 31);

        let ranks = RankCalculator::new(8);
        assert_eq!(ranks.rank(&remainder), 152);
    }

    #[test]
    fn test_small_rank_not_clamped() {
        let ranks = RankCalculator::new(2);
        assert_eq!(ranks.rank(&Remainder::new([0x40], 0)), 2);
        assert_eq!(ranks.rank(&Remainder::new([0x10], 0)), 3);
        assert_eq!(ranks.clamp(0), 0);
    }
}

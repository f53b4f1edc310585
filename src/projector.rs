//! Splitting of item digests into a bucket index and remainder bits.
//!
//! For a sketch with `m = 2^k` buckets the first `k` bits of the digest select the
//! bucket, the remaining `DIGEST_BITS - k` bits are handed to the
//! [`RankCalculator`](crate::rank::RankCalculator).

use crate::error::ConfigurationError;
use crate::hash::HashProvider;

/// Widest bucket index a projector can extract, bounded by the 64-bit read in
/// `leading_bits` and by the width of `usize`.
pub const MAX_PROJECTED_BITS: u32 = if usize::BITS < 64 { usize::BITS } else { 64 };

/// Maps items to `(bucket index, remainder)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct HashProjector<H> {
    hasher: H,
    index_bits: u32,
}

impl<H: HashProvider> HashProjector<H> {
    /// Creates projector using `index_bits` leading digest bits for the bucket index.
    /// At least one digest bit must remain for rank computation and the index must fit
    /// into [`MAX_PROJECTED_BITS`].
    pub fn new(hasher: H, index_bits: u32) -> Result<Self, ConfigurationError> {
        if index_bits >= H::DIGEST_BITS {
            return Err(ConfigurationError::IndexBitsExceedDigest {
                index_bits,
                digest_bits: H::DIGEST_BITS,
            });
        }
        if index_bits > MAX_PROJECTED_BITS {
            return Err(ConfigurationError::TooManyBuckets {
                index_bits,
                max: MAX_PROJECTED_BITS,
            });
        }
        Ok(Self { hasher, index_bits })
    }

    #[inline]
    pub fn index_bits(&self) -> u32 {
        self.index_bits
    }

    #[inline]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Hash `item` and split its digest into bucket index and remainder bits.
    #[inline]
    pub fn project(&self, item: &[u8]) -> (usize, Remainder<H::Digest>) {
        let digest = self.hasher.digest(item);
        let index = leading_bits(digest.as_ref(), self.index_bits);
        (index, Remainder::new(digest, self.index_bits as usize))
    }
}

/// Digest bits following the bucket index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remainder<D> {
    digest: D,
    offset: usize,
}

impl<D: AsRef<[u8]>> Remainder<D> {
    /// Remainder made of all bits of `digest` starting at bit `offset`.
    #[inline]
    pub fn new(digest: D, offset: usize) -> Self {
        Self { digest, offset }
    }

    /// Number of remainder bits
    #[inline]
    pub fn width(&self) -> usize {
        (self.digest.as_ref().len() * 8).saturating_sub(self.offset)
    }

    /// Number of zero bits before the first set bit, or `width()` if there is none.
    #[inline]
    pub fn leading_zeros(&self) -> usize {
        let bytes = self.digest.as_ref();
        let start = self.offset / 8;
        let shift = self.offset % 8;
        let mut zeros = 0;
        for (i, &byte) in bytes.iter().enumerate().skip(start) {
            // the first byte may still hold index bits; shift them out
            let (byte, available) = if i == start {
                (byte << shift, 8 - shift)
            } else {
                (byte, 8)
            };
            if byte != 0 {
                return zeros + byte.leading_zeros() as usize;
            }
            zeros += available;
        }
        zeros
    }
}

/// Return value of the first `n` bits of `bytes`. Callers guarantee
/// `n <= MAX_PROJECTED_BITS` and `n < 8 * bytes.len()`.
#[inline]
fn leading_bits(bytes: &[u8], n: u32) -> usize {
    if n == 0 {
        return 0;
    }
    let taken = bytes.len().min(8);
    let word = bytes[..taken]
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
    (word >> (taken as u32 * 8 - n)) as usize
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::hash::{Sha1Hasher, WyHasher};
    use test_case::test_case;

    /// Hash provider returning the same digest for every item
    #[derive(Debug, Clone, PartialEq)]
    struct FixedHasher([u8; 8]);

    impl HashProvider for FixedHasher {
        type Digest = [u8; 8];
        const DIGEST_BITS: u32 = 64;

        fn digest(&self, _item: &[u8]) -> [u8; 8] {
            self.0
        }
    }

    #[test_case([0b1011_0001, 0, 0, 0, 0, 0, 0, 0], 3 => (5, 0, 61))]
    #[test_case([0b1010_0000, 0b0000_0100, 0, 0, 0, 0, 0, 0], 3 => (5, 10, 61))]
    #[test_case([0xff, 0xff, 0x80, 0, 0, 0, 0, 0], 16 => (0xffff, 0, 48))]
    #[test_case([0xff, 0xff, 0x00, 0x01, 0, 0, 0, 0], 16 => (0xffff, 15, 48))]
    #[test_case([0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0], 12 => (0x123, 1, 52))]
    #[test_case([0; 8], 1 => (0, 63, 63))]
    #[test_case([0; 8], 63 => (0, 1, 1))]
    #[test_case([0xff; 8], 63 => (usize::MAX >> 1, 0, 1); "all ones, wide index")]
    fn test_project(digest: [u8; 8], index_bits: u32) -> (usize, usize, usize) {
        let projector = HashProjector::new(FixedHasher(digest), index_bits).unwrap();
        let (index, remainder) = projector.project(b"anything");
        (index, remainder.leading_zeros(), remainder.width())
    }

    #[test]
    fn test_index_bits_exceed_digest() {
        assert_eq!(
            HashProjector::new(WyHasher::default(), 64),
            Err(ConfigurationError::IndexBitsExceedDigest {
                index_bits: 64,
                digest_bits: 64
            })
        );
        assert!(HashProjector::new(WyHasher::default(), 63).is_ok());
        assert!(HashProjector::new(Sha1Hasher, 160).is_err());
        assert!(HashProjector::new(Sha1Hasher, 26).is_ok());
    }

    #[test_case(65)]
    #[test_case(100)]
    #[test_case(159)]
    fn test_index_bits_too_wide(index_bits: u32) {
        assert_eq!(
            HashProjector::new(Sha1Hasher, index_bits),
            Err(ConfigurationError::TooManyBuckets {
                index_bits,
                max: MAX_PROJECTED_BITS
            })
        );
    }

    #[test]
    fn test_project_widest_index() {
        let projector = HashProjector::new(Sha1Hasher, MAX_PROJECTED_BITS).unwrap();
        let (index, remainder) = projector.project(b"abc");
        // a9993e364706816a... is the SHA-1 digest of "abc"
        assert_eq!(index as u64 >> (MAX_PROJECTED_BITS - 16), 0xa999);
        assert_eq!(remainder.width(), 160 - MAX_PROJECTED_BITS as usize);
    }

    #[test]
    fn test_index_in_range() {
        let projector = HashProjector::new(Sha1Hasher, 9).unwrap();
        for i in 0..10_000u32 {
            let (index, remainder) = projector.project(&i.to_le_bytes());
            assert!(index < 512);
            assert_eq!(remainder.width(), 151);
        }
    }

    #[test]
    fn test_deterministic() {
        let lhs = HashProjector::new(Sha1Hasher, 9).unwrap();
        let rhs = HashProjector::new(Sha1Hasher, 9).unwrap();
        assert_eq!(lhs.project(b"item"), rhs.project(b"item"));
    }
}

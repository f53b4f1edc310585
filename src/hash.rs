//! Hash providers turning items into fixed-width digests.
//!
//! Digests are read most significant bit first: the leading bits select a bucket and
//! the trailing bits are used for the rank. Every provider must be deterministic, so
//! that sketches built in different processes can be merged.

use sha1::Digest as _;
use sha1::Sha1;

/// Source of uniformly distributed fixed-width digests.
pub trait HashProvider: Clone + PartialEq {
    /// Digest bytes, most significant byte first
    type Digest: AsRef<[u8]>;
    /// Width of every digest in bits
    const DIGEST_BITS: u32;

    /// Compute digest of `item`
    fn digest(&self, item: &[u8]) -> Self::Digest;
}

/// 160-bit SHA-1 digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha1Hasher;

impl HashProvider for Sha1Hasher {
    type Digest = [u8; 20];
    const DIGEST_BITS: u32 = 160;

    #[inline]
    fn digest(&self, item: &[u8]) -> [u8; 20] {
        let mut out = [0u8; 20];
        out.copy_from_slice(&Sha1::digest(item));
        out
    }
}

/// 64-bit wyhash digest with a configurable seed.
///
/// Much faster than SHA-1. Sketches are only mergeable when built with the same seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WyHasher {
    seed: u64,
}

impl WyHasher {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl HashProvider for WyHasher {
    type Digest = [u8; 8];
    const DIGEST_BITS: u32 = 64;

    #[inline]
    fn digest(&self, item: &[u8]) -> [u8; 8] {
        wyhash::wyhash(item, self.seed).to_be_bytes()
    }
}

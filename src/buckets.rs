//! ## Bucket array
//! Fixed number of `W`-bit buckets packed into a `u32` slice, so the memory used by
//! the buckets is exactly `len * W` bits rounded up to a word, plus one word.
//!
//! Bucket `i` occupies bits `i * W..(i + 1) * W` of the slice, counted from the least
//! significant bit of `words[0]`. A bucket may span two consecutive words; the extra
//! trailing word lets reads and writes always touch two words without branching.

use std::mem::{size_of, size_of_val};

use crate::error::Incompatibility;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketArray {
    /// Bits per bucket, 1 to 8
    width: u8,
    /// Number of buckets
    len: usize,
    /// Packed bucket values
    words: Vec<u32>,
}

impl BucketArray {
    /// Creates `len` zeroed buckets of `width` bits each.
    pub fn new(len: usize, width: u8) -> Self {
        let width = width.clamp(1, 8);
        let words = vec![0u32; (len * usize::from(width)).div_ceil(32) + 1];
        Self { width, len, words }
    }

    /// Number of buckets
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bits per bucket
    #[inline]
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Get value of bucket `idx`
    #[inline]
    pub fn get(&self, idx: usize) -> u8 {
        let (word_idx, bit_pos, bits_1, bits_2) = self.locate(idx);
        let bits = &self.words[word_idx..word_idx + 2];
        let mask_1 = (1u32 << bits_1) - 1;
        let mask_2 = (1u32 << bits_2) - 1;

        (((bits[0] >> bit_pos) & mask_1) | ((bits[1] & mask_2) << bits_1)) as u8
    }

    /// Set bucket `idx` to `value`, truncated to the bucket width
    #[inline]
    pub fn set(&mut self, idx: usize, value: u8) {
        let (word_idx, bit_pos, bits_1, bits_2) = self.locate(idx);
        let bits = &mut self.words[word_idx..word_idx + 2];
        let mask_1 = (1u32 << bits_1) - 1;
        let mask_2 = (1u32 << bits_2) - 1;
        let value = u32::from(value);

        // Unconditionally update two `u32` elements based on `value` bits and masks
        bits[0] &= !(mask_1 << bit_pos);
        bits[0] |= (value & mask_1) << bit_pos;
        bits[1] &= !mask_2;
        bits[1] |= (value >> bits_1) & mask_2;
    }

    /// Raise bucket `idx` to `value` if it is currently lower.
    /// Returns the previous value when the bucket changed.
    #[inline]
    pub fn raise(&mut self, idx: usize, value: u8) -> Option<u8> {
        let old = self.get(idx);
        if value > old {
            self.set(idx, value);
            Some(old)
        } else {
            None
        }
    }

    /// Bucket-wise maximum with `rhs`, which must have the same length and width.
    /// Returns number of raised buckets.
    pub fn merge(&mut self, rhs: &BucketArray) -> Result<usize, Incompatibility> {
        if self.len != rhs.len {
            return Err(Incompatibility::BucketCount {
                lhs: self.len,
                rhs: rhs.len,
            });
        }
        if self.width != rhs.width {
            return Err(Incompatibility::BucketWidth {
                lhs: self.width,
                rhs: rhs.width,
            });
        }
        let mut raised = 0;
        for idx in 0..self.len {
            if self.raise(idx, rhs.get(idx)).is_some() {
                raised += 1;
            }
        }
        Ok(raised)
    }

    /// Iterate over bucket values
    pub fn iter(&self) -> impl ExactSizeIterator<Item = u8> + '_ {
        (0..self.len).map(|idx| self.get(idx))
    }

    /// Sum of all bucket values
    #[inline]
    pub fn sum(&self) -> u64 {
        self.iter().map(u64::from).sum()
    }

    /// Number of buckets set to zero
    #[inline]
    pub fn zeros(&self) -> usize {
        self.iter().filter(|&v| v == 0).count()
    }

    /// Reset all buckets to zero
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Logical size of the buckets in bits
    #[inline]
    pub fn size_in_bits(&self) -> usize {
        self.len * usize::from(self.width)
    }

    /// Memory size of `BucketArray` in bytes
    #[inline]
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + size_of_val(self.words.as_slice())
    }

    /// Return word index, bit position within the word and number of bits
    /// stored in the first and the second word for bucket `idx`
    #[inline]
    fn locate(&self, idx: usize) -> (usize, usize, usize, usize) {
        debug_assert!(idx < self.len);
        let width = usize::from(self.width);
        let bit_idx = idx * width;
        let bit_pos = bit_idx % 32;
        let bits_1 = width.min(32 - bit_pos);
        (bit_idx / 32, bit_pos, bits_1, width - bits_1)
    }
}

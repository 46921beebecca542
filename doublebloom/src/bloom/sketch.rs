// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::iter::FusedIterator;

use super::sizing;
use super::BitArray;
use crate::error::Error;
use crate::hash::DoubleHasher;
use crate::hash::XxHashPair;

/// A Bloom filter for probabilistic set membership testing.
///
/// Provides fast membership queries with:
/// - No false negatives (inserted items always return `true`)
/// - Tunable false positive rate
/// - Constant space usage
///
/// Construct with [`BloomFilter::new`], [`BloomFilter::with_hasher`] or
/// [`super::BloomFilterBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct BloomFilter<H = XxHashPair> {
    /// Number of bit positions derived per item (k)
    num_hashes: u64,
    /// Count of bits set to 1 (for statistics)
    num_bits_set: u64,
    /// Bit array of length m
    bit_array: BitArray,
    hasher: H,
}

impl BloomFilter {
    /// Creates an empty filter of `num_bits` bits and `num_hashes` hashes per item, using
    /// the default [`XxHashPair`] hasher.
    ///
    /// # Errors
    ///
    /// - `InvalidParameters` if `num_bits` or `num_hashes` is 0.
    /// - `CapacityExceeded` if the bit array cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// # use doublebloom::bloom::BloomFilter;
    /// let filter = BloomFilter::new(10_000_000, 5).unwrap();
    /// assert_eq!(filter.num_bits(), 10_000_000);
    /// assert_eq!(filter.num_hashes(), 5);
    /// assert!(BloomFilter::new(0, 5).is_err());
    /// ```
    pub fn new(num_bits: u64, num_hashes: u64) -> Result<Self, Error> {
        Self::with_hasher(num_bits, num_hashes, XxHashPair::default())
    }
}

impl<H: DoubleHasher> BloomFilter<H> {
    /// Creates an empty filter that derives bit positions from `hasher`.
    ///
    /// # Errors
    ///
    /// Same as [`BloomFilter::new`].
    pub fn with_hasher(num_bits: u64, num_hashes: u64, hasher: H) -> Result<Self, Error> {
        if num_hashes == 0 {
            return Err(Error::invalid_parameters("num_hashes must be at least 1")
                .with_context("num_bits", num_bits)
                .with_context("num_hashes", num_hashes));
        }
        let bit_array = BitArray::new(num_bits)?;

        log::debug!(
            "allocated bloom filter: num_bits={num_bits}, num_hashes={num_hashes}, words={}",
            bit_array.words().len()
        );

        Ok(BloomFilter {
            num_hashes,
            num_bits_set: 0,
            bit_array,
            hasher,
        })
    }

    /// Inserts an item into the filter.
    ///
    /// After insertion, `contains(item)` will always return `true` until the filter is
    /// cleared. Inserting the same item again leaves the filter unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use doublebloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(1024, 3).unwrap();
    ///
    /// filter.insert("apple");
    /// filter.insert(42_u64.to_le_bytes());
    /// filter.insert([1u8, 2, 3]);
    ///
    /// assert!(filter.contains("apple"));
    /// ```
    pub fn insert<T: AsRef<[u8]>>(&mut self, item: T) {
        let pair = self.hasher.hash_pair(item.as_ref());
        self.insert_pair(pair);
    }

    /// Tests whether an item is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Item was **possibly** inserted (or false positive)
    /// - `false`: Item was **definitely not** inserted
    pub fn contains<T: AsRef<[u8]>>(&self, item: T) -> bool {
        if self.is_empty() {
            return false;
        }
        let pair = self.hasher.hash_pair(item.as_ref());
        self.contains_pair(pair)
    }

    /// Tests and inserts an item in a single operation.
    ///
    /// Returns whether the item was possibly already in the set before insertion. The
    /// item is hashed once.
    ///
    /// # Examples
    ///
    /// ```
    /// # use doublebloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(1024, 3).unwrap();
    /// assert!(!filter.contains_and_insert("apple"));
    /// assert!(filter.contains_and_insert("apple"));
    /// ```
    pub fn contains_and_insert<T: AsRef<[u8]>>(&mut self, item: T) -> bool {
        let pair = self.hasher.hash_pair(item.as_ref());
        self.contains_and_insert_pair(pair)
    }

    /// Returns the `k` bit positions an item maps to, in derivation order.
    pub fn bit_indices<T: AsRef<[u8]>>(&self, item: T) -> BitIndices {
        let (x, y) = self.hasher.hash_pair(item.as_ref());
        BitIndices::new(x, y, self.num_bits(), self.num_hashes)
    }

    /// Returns the hasher deriving bit positions.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub(crate) fn insert_pair(&mut self, (x, y): (u64, u64)) {
        for offset in BitIndices::new(x, y, self.num_bits(), self.num_hashes) {
            if self.bit_array.set_bit(offset) {
                self.num_bits_set += 1;
            }
        }
    }

    pub(crate) fn contains_pair(&self, (x, y): (u64, u64)) -> bool {
        BitIndices::new(x, y, self.num_bits(), self.num_hashes)
            .all(|offset| self.bit_array.get_bit(offset))
    }

    pub(crate) fn contains_and_insert_pair(&mut self, pair: (u64, u64)) -> bool {
        let was_present = self.contains_pair(pair);
        if !was_present {
            self.insert_pair(pair);
        }
        was_present
    }
}

impl<H> BloomFilter<H> {
    /// Resets the filter to its initial empty state.
    ///
    /// Clears all bits in place while preserving size, hash count and hasher.
    ///
    /// # Examples
    ///
    /// ```
    /// # use doublebloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(1024, 3).unwrap();
    /// filter.insert("apple");
    /// assert!(!filter.is_empty());
    ///
    /// filter.clear();
    /// assert!(filter.is_empty());
    /// assert!(!filter.contains("apple"));
    /// ```
    pub fn clear(&mut self) {
        self.bit_array.clear();
        self.num_bits_set = 0;
        log::debug!("cleared bloom filter: num_bits={}", self.num_bits());
    }

    /// Analytic false positive rate after `num_items` distinct insertions, using this
    /// filter's size and hash count.
    ///
    /// This is a planning figure: it is not measured from the bits actually set, so it
    /// drifts from the observed rate when the real insertion count differs from
    /// `num_items`. See [`current_fpr()`](Self::current_fpr) for an occupancy-based value.
    pub fn estimate_fpr(&self, num_items: u64) -> f64 {
        sizing::estimated_fpr(
            self.num_bits() as f64,
            num_items as f64,
            self.num_hashes as f64,
        )
    }

    /// Estimates the current false positive probability from occupancy.
    ///
    /// Uses the approximation `load_factor^k`.
    pub fn current_fpr(&self) -> f64 {
        self.load_factor().powf(self.num_hashes as f64)
    }

    /// Approximates the number of distinct items inserted so far.
    ///
    /// Formula: `n ≈ -(m / k) * ln(1 - X / m)` where `X` is the number of set bits.
    /// Returns `f64::INFINITY` once every bit is set.
    pub fn estimated_len(&self) -> f64 {
        let m = self.num_bits() as f64;
        let k = self.num_hashes as f64;
        if self.num_bits_set >= self.num_bits() {
            return f64::INFINITY;
        }
        -(m / k) * (-(self.num_bits_set as f64) / m).ln_1p()
    }

    /// Returns whether the filter is empty (no items inserted).
    pub fn is_empty(&self) -> bool {
        self.num_bits_set == 0
    }

    /// Returns the number of bits set to 1.
    ///
    /// Useful for monitoring filter saturation.
    pub fn bits_used(&self) -> u64 {
        self.num_bits_set
    }

    /// Returns the current load factor (fraction of bits set).
    ///
    /// Values above 0.5 indicate the filter is past its optimal fill.
    pub fn load_factor(&self) -> f64 {
        self.num_bits_set as f64 / self.num_bits() as f64
    }

    /// Returns the total number of bits in the filter (m).
    pub fn num_bits(&self) -> u64 {
        self.bit_array.num_bits()
    }

    /// Returns the number of bit positions derived per item (k).
    pub fn num_hashes(&self) -> u64 {
        self.num_hashes
    }

    /// Returns the packed bit array.
    ///
    /// Together with [`num_bits()`](Self::num_bits), [`num_hashes()`](Self::num_hashes) and
    /// the hasher this is the complete state of the filter.
    pub fn words(&self) -> &[u64] {
        self.bit_array.words()
    }
}

impl<H: PartialEq> BloomFilter<H> {
    /// Checks if two filters are compatible for merging.
    ///
    /// Filters are compatible if they have the same:
    /// - Number of bits
    /// - Number of hashes
    /// - Hasher (including its seed)
    pub fn is_compatible(&self, other: &BloomFilter<H>) -> bool {
        self.num_bits() == other.num_bits()
            && self.num_hashes == other.num_hashes
            && self.hasher == other.hasher
    }

    /// Merges another filter into this one via bitwise OR (union).
    ///
    /// Afterwards this filter recognizes items from either filter.
    ///
    /// # Errors
    ///
    /// `InvalidParameters` if the filters are not [compatible](Self::is_compatible); this
    /// filter is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// # use doublebloom::bloom::BloomFilter;
    /// let mut f1 = BloomFilter::new(1024, 3).unwrap();
    /// let mut f2 = BloomFilter::new(1024, 3).unwrap();
    /// f1.insert("a");
    /// f2.insert("b");
    ///
    /// f1.union(&f2).unwrap();
    /// assert!(f1.contains("a"));
    /// assert!(f1.contains("b"));
    /// ```
    pub fn union(&mut self, other: &BloomFilter<H>) -> Result<(), Error> {
        self.check_compatible(other, "union")?;
        self.num_bits_set = self.bit_array.merge_with(&other.bit_array, |a, b| a | b);
        log::trace!("union: num_bits_set={}", self.num_bits_set);
        Ok(())
    }

    /// Intersects this filter with another via bitwise AND.
    ///
    /// Afterwards this filter recognizes items present in both filters, plus false
    /// positives.
    ///
    /// # Errors
    ///
    /// `InvalidParameters` if the filters are not [compatible](Self::is_compatible).
    pub fn intersect(&mut self, other: &BloomFilter<H>) -> Result<(), Error> {
        self.check_compatible(other, "intersect")?;
        self.num_bits_set = self.bit_array.merge_with(&other.bit_array, |a, b| a & b);
        log::trace!("intersect: num_bits_set={}", self.num_bits_set);
        Ok(())
    }

    fn check_compatible(&self, other: &BloomFilter<H>, what: &'static str) -> Result<(), Error> {
        if self.is_compatible(other) {
            return Ok(());
        }
        Err(Error::incompatible_filters(what)
            .with_context("num_bits", format!("{} vs {}", self.num_bits(), other.num_bits()))
            .with_context(
                "num_hashes",
                format!("{} vs {}", self.num_hashes, other.num_hashes),
            ))
    }
}

/// Bit positions of one item, derived by enhanced double hashing.
///
/// Starting from the base pair `(x, y)`, each step emits `x mod m` and then advances
/// `x += y; y += i` with wrapping arithmetic, where `i` is the 0-based step. The `y += i`
/// term keeps the sequence from cycling when `y` is small or shares a factor with `m`.
///
/// Reference: Dillinger and Manolios (2004), "Bloom Filters in Probabilistic
/// Verification".
///
/// # Examples
///
/// ```
/// # use doublebloom::bloom::BitIndices;
/// let indices: Vec<u64> = BitIndices::new(5, 3, 100, 4).collect();
/// assert_eq!(indices, vec![5, 8, 11, 15]);
/// ```
#[derive(Debug, Clone)]
pub struct BitIndices {
    x: u64,
    y: u64,
    step: u64,
    num_bits: u64,
    num_hashes: u64,
}

impl BitIndices {
    /// Creates the position sequence for base pair `(x, y)` over `num_bits` bits.
    ///
    /// # Panics
    ///
    /// Panics if `num_bits` is 0.
    pub fn new(x: u64, y: u64, num_bits: u64, num_hashes: u64) -> Self {
        assert!(num_bits > 0, "num_bits must be at least 1");
        BitIndices {
            x,
            y,
            step: 0,
            num_bits,
            num_hashes,
        }
    }
}

impl Iterator for BitIndices {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.step == self.num_hashes {
            return None;
        }
        let offset = self.x % self.num_bits;
        self.x = self.x.wrapping_add(self.y);
        self.y = self.y.wrapping_add(self.step);
        self.step += 1;
        Some(offset)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.num_hashes - self.step;
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for BitIndices {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::hash::FnvPair;

    #[test]
    fn test_indices_follow_recurrence() {
        let mut x = 0x1234_5678_9abc_def0u64;
        let mut y = 0xfeed_beef_cafe_f00du64;
        let expected: Vec<u64> = (0..16u64)
            .map(|i| {
                let offset = x % 1_000_003;
                x = x.wrapping_add(y);
                y = y.wrapping_add(i);
                offset
            })
            .collect();

        let actual: Vec<u64> =
            BitIndices::new(0x1234_5678_9abc_def0, 0xfeed_beef_cafe_f00d, 1_000_003, 16).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_indices_avoid_cycling_with_zero_step() {
        // plain double hashing would emit 7 for every step when y == 0
        let indices: Vec<u64> = BitIndices::new(7, 0, 1 << 20, 4).collect();
        assert_eq!(indices, vec![7, 7, 7, 8]);
    }

    #[test]
    fn test_indices_len() {
        let indices = BitIndices::new(1, 2, 10, 7);
        assert_eq!(indices.size_hint(), (7, Some(7)));
        assert_eq!(indices.count(), 7);
    }

    #[test]
    fn test_insert_and_contains() {
        let mut filter = BloomFilter::new(1024, 4).unwrap();

        assert!(!filter.contains("apple"));
        filter.insert("apple");
        assert!(filter.contains("apple"));
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_bit_indices_are_the_set_bits() {
        let mut filter = BloomFilter::with_hasher(4096, 6, FnvPair).unwrap();
        filter.insert(b"only item");

        let mut offsets: Vec<u64> = filter.bit_indices(b"only item").collect();
        offsets.sort_unstable();
        offsets.dedup();
        assert_eq!(filter.bits_used(), offsets.len() as u64);
        for offset in offsets {
            assert!(filter.bit_array.get_bit(offset));
        }
    }

    #[test]
    fn test_contains_and_insert() {
        let mut filter = BloomFilter::new(1024, 4).unwrap();
        assert!(!filter.contains_and_insert(42_u64.to_le_bytes()));
        assert!(filter.contains_and_insert(42_u64.to_le_bytes()));
        assert!(filter.contains(42_u64.to_le_bytes()));
    }

    #[test]
    fn test_zero_hashes_rejected() {
        let err = BloomFilter::new(1024, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameters);
    }

    #[test]
    fn test_statistics() {
        let mut filter = BloomFilter::new(1000, 5).unwrap();
        assert_eq!(filter.bits_used(), 0);
        assert_eq!(filter.load_factor(), 0.0);
        assert_eq!(filter.current_fpr(), 0.0);
        assert_eq!(filter.estimated_len(), 0.0);

        filter.insert("test");
        assert!(filter.bits_used() > 0 && filter.bits_used() <= 5);
        assert!(filter.load_factor() > 0.0);
        assert!(filter.current_fpr() > 0.0);
        let len = filter.estimated_len();
        assert!(len > 0.5 && len < 1.5, "len = {len}");
    }

    #[test]
    fn test_saturated_len_is_infinite() {
        let mut filter = BloomFilter::new(1, 1).unwrap();
        filter.insert("anything");
        assert_eq!(filter.load_factor(), 1.0);
        assert!(filter.estimated_len().is_infinite());
        assert!(filter.contains("everything else"));
    }

    #[test]
    fn test_union_and_intersect() {
        let mut f1 = BloomFilter::new(2048, 4).unwrap();
        let mut f2 = BloomFilter::new(2048, 4).unwrap();
        f1.insert("a");
        f1.insert("b");
        f2.insert("b");
        f2.insert("c");

        let mut union = f1.clone();
        union.union(&f2).unwrap();
        assert!(union.contains("a") && union.contains("b") && union.contains("c"));
        assert_eq!(union.bits_used(), union.bit_array.count_ones());

        f1.intersect(&f2).unwrap();
        assert!(f1.contains("b"));
        assert_eq!(f1.bits_used(), f1.bit_array.count_ones());
    }

    #[test]
    fn test_incompatible_union_rejected() {
        let mut f1 = BloomFilter::new(2048, 4).unwrap();
        let f2 = BloomFilter::new(2048, 5).unwrap();
        let f3 = BloomFilter::with_hasher(2048, 4, XxHashPair::with_seed(1)).unwrap();
        f1.insert("a");
        let before = f1.clone();

        assert_eq!(f1.union(&f2).unwrap_err().kind(), ErrorKind::InvalidParameters);
        assert_eq!(f1.intersect(&f3).unwrap_err().kind(), ErrorKind::InvalidParameters);
        assert_eq!(f1, before);
    }
}

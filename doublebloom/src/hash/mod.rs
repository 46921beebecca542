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

//! Two-value hash functions feeding the filter's index derivation.
//!
//! A Bloom filter needs `k` bit positions per item. Instead of `k` independent hash
//! evaluations it asks a [`DoubleHasher`] for two decorrelated 64-bit values and derives
//! every position from those (see [`BitIndices`](crate::bloom::BitIndices)).
//!
//! Hashers are pure functions of the item bytes: there is no reusable hashing object and
//! no per-call state, so a filter can be shared across threads without guarding the hasher.

mod fnv;
mod murmurhash;
mod xxhash;

pub use self::fnv::fnv1_64;
pub use self::fnv::fnv1a_64;
pub use self::murmurhash::murmur3_x64_128;
pub use self::xxhash::xxh64;

/// The default seed 9001, a prime carried over from the sketching libraries this crate
/// grew out of.
///
/// Two filters only agree on bit positions when they share the hash family and the seed,
/// so a filter restored from a snapshot of its words must be rebuilt with the same seed.
pub const DEFAULT_SEED: u64 = 9001;

/// Maps the bytes of an item to the two base hash values `(x, y)`.
///
/// Implementations must be deterministic: the same bytes always produce the same pair,
/// otherwise an inserted item would not be recognized later.
///
/// Any `Fn(&[u8]) -> (u64, u64)` is a `DoubleHasher`, so callers can plug in their own
/// hash without defining a type:
///
/// ```
/// # use doublebloom::bloom::BloomFilter;
/// # use doublebloom::hash::{fnv1_64, fnv1a_64};
/// let hasher = |bytes: &[u8]| (fnv1a_64(bytes), fnv1_64(bytes).rotate_left(17));
/// let mut filter = BloomFilter::with_hasher(1024, 3, hasher).unwrap();
/// filter.insert("apple");
/// assert!(filter.contains("apple"));
/// ```
pub trait DoubleHasher {
    /// Returns the two base hash values of `bytes`.
    fn hash_pair(&self, bytes: &[u8]) -> (u64, u64);
}

impl<F> DoubleHasher for F
where
    F: Fn(&[u8]) -> (u64, u64),
{
    fn hash_pair(&self, bytes: &[u8]) -> (u64, u64) {
        self(bytes)
    }
}

/// Two chained XXH64 evaluations: `x = XXH64(bytes, seed)`, `y = XXH64(bytes, x)`.
///
/// This is the default hasher of [`BloomFilter`](crate::bloom::BloomFilter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XxHashPair {
    seed: u64,
}

impl XxHashPair {
    /// Creates the hasher with a custom seed.
    pub fn with_seed(seed: u64) -> Self {
        XxHashPair { seed }
    }

    /// Returns the seed of the first evaluation.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for XxHashPair {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl DoubleHasher for XxHashPair {
    fn hash_pair(&self, bytes: &[u8]) -> (u64, u64) {
        let x = xxh64(bytes, self.seed);
        // the first value seeds the second so the pair stays decorrelated
        let y = xxh64(bytes, x);
        (x, y)
    }
}

/// Two independent unseeded hashes: `x = FNV-1a(bytes)`, `y = FNV-1(bytes)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FnvPair;

impl DoubleHasher for FnvPair {
    fn hash_pair(&self, bytes: &[u8]) -> (u64, u64) {
        (fnv1a_64(bytes), fnv1_64(bytes))
    }
}

/// One MurmurHash3 x64/128 evaluation split into its two 64-bit halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MurmurSplit {
    seed: u64,
}

impl MurmurSplit {
    /// Creates the hasher with a custom seed.
    pub fn with_seed(seed: u64) -> Self {
        MurmurSplit { seed }
    }

    /// Returns the seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for MurmurSplit {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl DoubleHasher for MurmurSplit {
    fn hash_pair(&self, bytes: &[u8]) -> (u64, u64) {
        murmur3_x64_128(bytes, self.seed)
    }
}

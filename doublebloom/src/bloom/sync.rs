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

use parking_lot::RwLock;

use super::BloomFilter;
use crate::error::Error;
use crate::hash::DoubleHasher;
use crate::hash::XxHashPair;

/// A [`BloomFilter`] shared between threads behind a single read-write lock.
///
/// Mutations (`insert`, `contains_and_insert`, `clear`, `union`) take the write lock;
/// queries take the read lock, so concurrent `contains` calls proceed in parallel. Items
/// are hashed before the lock is acquired with a private copy of the hasher, so only the
/// bit array accesses are serialized.
///
/// # Examples
///
/// ```
/// # use doublebloom::bloom::{BloomFilter, SyncBloomFilter};
/// let filter = SyncBloomFilter::new(BloomFilter::new(1 << 16, 4).unwrap());
///
/// std::thread::scope(|s| {
///     for t in 0..4u64 {
///         let filter = &filter;
///         s.spawn(move || {
///             for i in 0..100u64 {
///                 filter.insert((t * 100 + i).to_le_bytes());
///             }
///         });
///     }
/// });
///
/// assert!(filter.contains(250u64.to_le_bytes()));
/// ```
#[derive(Debug)]
pub struct SyncBloomFilter<H = XxHashPair> {
    hasher: H,
    num_bits: u64,
    num_hashes: u64,
    inner: RwLock<BloomFilter<H>>,
}

impl<H: DoubleHasher + Clone> SyncBloomFilter<H> {
    /// Wraps `filter` for shared use.
    pub fn new(filter: BloomFilter<H>) -> Self {
        SyncBloomFilter {
            hasher: filter.hasher().clone(),
            num_bits: filter.num_bits(),
            num_hashes: filter.num_hashes(),
            inner: RwLock::new(filter),
        }
    }

    /// Inserts an item; see [`BloomFilter::insert`].
    pub fn insert<T: AsRef<[u8]>>(&self, item: T) {
        let pair = self.hasher.hash_pair(item.as_ref());
        self.inner.write().insert_pair(pair);
    }

    /// Tests an item; see [`BloomFilter::contains`].
    pub fn contains<T: AsRef<[u8]>>(&self, item: T) -> bool {
        let pair = self.hasher.hash_pair(item.as_ref());
        let filter = self.inner.read();
        !filter.is_empty() && filter.contains_pair(pair)
    }

    /// Tests and inserts an item under one write lock; see
    /// [`BloomFilter::contains_and_insert`].
    pub fn contains_and_insert<T: AsRef<[u8]>>(&self, item: T) -> bool {
        let pair = self.hasher.hash_pair(item.as_ref());
        self.inner.write().contains_and_insert_pair(pair)
    }
}

impl<H> SyncBloomFilter<H> {
    /// Resets the filter to empty.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// See [`BloomFilter::estimate_fpr`].
    pub fn estimate_fpr(&self, num_items: u64) -> f64 {
        self.inner.read().estimate_fpr(num_items)
    }

    /// See [`BloomFilter::current_fpr`].
    pub fn current_fpr(&self) -> f64 {
        self.inner.read().current_fpr()
    }

    /// See [`BloomFilter::estimated_len`].
    pub fn estimated_len(&self) -> f64 {
        self.inner.read().estimated_len()
    }

    /// See [`BloomFilter::bits_used`].
    pub fn bits_used(&self) -> u64 {
        self.inner.read().bits_used()
    }

    /// See [`BloomFilter::load_factor`].
    pub fn load_factor(&self) -> f64 {
        self.inner.read().load_factor()
    }

    /// See [`BloomFilter::is_empty`].
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Returns the total number of bits in the filter (m).
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Returns the number of bit positions derived per item (k).
    pub fn num_hashes(&self) -> u64 {
        self.num_hashes
    }

    /// Unwraps the inner filter.
    pub fn into_inner(self) -> BloomFilter<H> {
        self.inner.into_inner()
    }
}

impl<H: Clone> SyncBloomFilter<H> {
    /// Copies the current state out under the read lock.
    pub fn snapshot(&self) -> BloomFilter<H> {
        self.inner.read().clone()
    }
}

impl<H: PartialEq> SyncBloomFilter<H> {
    /// Merges `other` into this filter under the write lock; see [`BloomFilter::union`].
    pub fn union(&self, other: &BloomFilter<H>) -> Result<(), Error> {
        self.inner.write().union(other)
    }
}

impl<H: DoubleHasher + Clone> From<BloomFilter<H>> for SyncBloomFilter<H> {
    fn from(filter: BloomFilter<H>) -> Self {
        Self::new(filter)
    }
}

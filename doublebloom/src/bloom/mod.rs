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

//! Bloom filter implementation for probabilistic set membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! an element is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not in set".
//!
//! # Properties
//!
//! - **No false negatives**: If an item was inserted, `contains()` will always return `true`
//! - **Possible false positives**: `contains()` may return `true` for items never inserted
//! - **Fixed size**: the filter is never resized; items cannot be removed
//! - **Constant time**: insert and contains touch exactly `k` bits
//!
//! # Usage
//!
//! ```rust
//! use doublebloom::bloom::BloomFilterBuilder;
//!
//! // Create a filter optimized for 1000 items with 1% false positive rate
//! let mut filter = BloomFilterBuilder::with_accuracy(1000, 0.01).build().unwrap();
//!
//! // Insert items
//! filter.insert("apple");
//! filter.insert("banana");
//! filter.insert(42_u64.to_le_bytes());
//!
//! // Check membership
//! assert!(filter.contains("apple")); // true - definitely inserted
//! println!("grape: {}", filter.contains("grape")); // false unless a false positive
//!
//! // Get statistics
//! println!("Capacity: {} bits", filter.num_bits());
//! println!("Bits used: {}", filter.bits_used());
//! println!("Planned FPR: {:.4}%", filter.estimate_fpr(1000) * 100.0);
//! ```
//!
//! # Creating Filters
//!
//! By accuracy, through [`BloomFilterBuilder::with_accuracy`], or by explicit size with
//! [`BloomFilter::new`]:
//!
//! ```rust
//! # use doublebloom::bloom::BloomFilter;
//! let filter = BloomFilter::new(
//!     10_000_000, // Number of bits (m)
//!     5,          // Hashes per item (k)
//! )
//! .unwrap();
//! ```
//!
//! The pure functions in [`sizing`] help choose `m` and `k` up front.
//!
//! # Hashing
//!
//! Each item is hashed once into two 64-bit values by a [`DoubleHasher`]; the `k` bit
//! positions are then derived by enhanced double hashing ([`BitIndices`]). The default
//! hasher is [`XxHashPair`]; [`FnvPair`] and [`MurmurSplit`] are interchangeable
//! alternatives, as is any `Fn(&[u8]) -> (u64, u64)`.
//!
//! # Sharing
//!
//! [`BloomFilter`] is a plain value: mutate it through `&mut`. Use [`SyncBloomFilter`] when
//! several threads insert and test concurrently.
//!
//! [`DoubleHasher`]: crate::hash::DoubleHasher
//! [`XxHashPair`]: crate::hash::XxHashPair
//! [`FnvPair`]: crate::hash::FnvPair
//! [`MurmurSplit`]: crate::hash::MurmurSplit
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/time trade-offs in hash coding with allowable errors"
//! - Kirsch and Mitzenmacher (2008). "Less Hashing, Same Performance: Building a Better Bloom
//!   Filter"
//! - Dillinger and Manolios (2004). "Bloom Filters in Probabilistic Verification"

mod bit_array;
mod builder;
pub mod sizing;
mod sketch;
mod sync;

pub use self::bit_array::BitArray;
pub use self::builder::BloomFilterBuilder;
pub use self::sketch::BitIndices;
pub use self::sketch::BloomFilter;
pub use self::sync::SyncBloomFilter;

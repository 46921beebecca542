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

use super::sizing;
use super::BloomFilter;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::hash::DoubleHasher;
use crate::hash::XxHashPair;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Sizing {
    Accuracy { max_items: u64, fpr: f64 },
    Size { num_bits: u64, num_hashes: u64 },
}

/// Builder for creating [`BloomFilter`] instances.
///
/// Provides two construction modes:
/// - [`with_accuracy()`](Self::with_accuracy): Specify target items and false positive rate
///   (recommended)
/// - [`with_size()`](Self::with_size): Specify bit count and hash count (manual)
///
/// Parameters are validated by [`build()`](Self::build), which reports bad input as an
/// [`Error`] instead of panicking.
#[derive(Debug, Clone)]
pub struct BloomFilterBuilder<H = XxHashPair> {
    sizing: Sizing,
    hasher: H,
}

impl BloomFilterBuilder {
    /// Creates a builder that sizes the filter for a target accuracy.
    ///
    /// The bit count is `ceil(-n * ln(p) / ln(2)^2)` and the hash count is the optimal
    /// `ln(2) * m / n` rounded up.
    ///
    /// # Arguments
    ///
    /// - `max_items`: Maximum expected number of distinct items
    /// - `fpr`: Target false positive rate, strictly between 0 and 1 (e.g., 0.01 for 1%)
    ///
    /// # Examples
    ///
    /// ```
    /// # use doublebloom::bloom::BloomFilterBuilder;
    /// // Optimal for 1,000 items with 1% FPR
    /// let filter = BloomFilterBuilder::with_accuracy(1_000, 0.01).build().unwrap();
    /// assert_eq!(filter.num_bits(), 9_586);
    /// assert_eq!(filter.num_hashes(), 7);
    /// ```
    pub fn with_accuracy(max_items: u64, fpr: f64) -> Self {
        BloomFilterBuilder {
            sizing: Sizing::Accuracy { max_items, fpr },
            hasher: XxHashPair::default(),
        }
    }

    /// Creates a builder with manual size specification.
    ///
    /// # Examples
    ///
    /// ```
    /// # use doublebloom::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_size(10_000, 7).build().unwrap();
    /// assert_eq!(filter.num_bits(), 10_000);
    /// ```
    pub fn with_size(num_bits: u64, num_hashes: u64) -> Self {
        BloomFilterBuilder {
            sizing: Sizing::Size {
                num_bits,
                num_hashes,
            },
            hasher: XxHashPair::default(),
        }
    }

    /// Sets a custom seed for the default hasher (default: 9001).
    ///
    /// **Important**: Filters with different seeds cannot be merged.
    pub fn seed(mut self, seed: u64) -> Self {
        self.hasher = XxHashPair::with_seed(seed);
        self
    }
}

impl<H> BloomFilterBuilder<H> {
    /// Replaces the hasher deriving bit positions.
    ///
    /// # Examples
    ///
    /// ```
    /// # use doublebloom::bloom::BloomFilterBuilder;
    /// # use doublebloom::hash::FnvPair;
    /// let filter = BloomFilterBuilder::with_accuracy(100, 0.01)
    ///     .hasher(FnvPair)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(filter.hasher(), &FnvPair);
    /// ```
    pub fn hasher<H2: DoubleHasher>(self, hasher: H2) -> BloomFilterBuilder<H2> {
        BloomFilterBuilder {
            sizing: self.sizing,
            hasher,
        }
    }

    /// Returns the `(num_bits, num_hashes)` the builder would allocate.
    ///
    /// # Errors
    ///
    /// - `InvalidParameters` for zero items, a false positive rate outside `(0, 1)`, or a
    ///   zero bit or hash count.
    /// - `CapacityExceeded` if the accuracy target needs more than `u64::MAX` bits.
    pub fn parameters(&self) -> Result<(u64, u64), Error> {
        match self.sizing {
            Sizing::Size {
                num_bits,
                num_hashes,
            } => Ok((num_bits, num_hashes)),
            Sizing::Accuracy { max_items, fpr } => accuracy_parameters(max_items, fpr),
        }
    }
}

impl<H: DoubleHasher> BloomFilterBuilder<H> {
    /// Builds the Bloom filter.
    ///
    /// # Errors
    ///
    /// See [`parameters()`](Self::parameters) and [`BloomFilter::with_hasher`].
    pub fn build(self) -> Result<BloomFilter<H>, Error> {
        let (num_bits, num_hashes) = self.parameters()?;
        BloomFilter::with_hasher(num_bits, num_hashes, self.hasher)
    }
}

fn accuracy_parameters(max_items: u64, fpr: f64) -> Result<(u64, u64), Error> {
    if max_items == 0 {
        return Err(Error::invalid_parameters("max_items must be greater than 0"));
    }
    // negated form also rejects NaN
    if !(fpr > 0.0 && fpr < 1.0) {
        return Err(
            Error::invalid_parameters("fpr must be strictly between 0.0 and 1.0")
                .with_context("fpr", fpr),
        );
    }

    let n = max_items as f64;
    let bits = sizing::optimal_num_bits(n, fpr).ceil();
    if !bits.is_finite() || bits >= u64::MAX as f64 {
        return Err(Error::new(
            ErrorKind::CapacityExceeded,
            "accuracy target needs more bits than a u64 can count",
        )
        .with_context("max_items", max_items)
        .with_context("fpr", fpr));
    }
    let num_bits = (bits as u64).max(1);

    // Ceil to avoid selecting too few hashes.
    let num_hashes = sizing::optimal_k(num_bits as f64, n).ceil().max(1.0) as u64;
    Ok((num_bits, num_hashes))
}

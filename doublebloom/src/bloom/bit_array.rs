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

use crate::error::Error;

const LOG_WORD_BITS: u32 = 6;
const WORD_BITS: u64 = 1 << LOG_WORD_BITS;

/// A fixed-length bit vector packed into `u64` words.
///
/// Holds `ceil(num_bits / 64)` words. Bits past `num_bits` in the last word are never set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitArray {
    num_bits: u64,
    words: Vec<u64>,
}

impl BitArray {
    /// Allocates an all-zero bit array of `num_bits` bits.
    ///
    /// # Errors
    ///
    /// - `InvalidParameters` if `num_bits` is 0.
    /// - `CapacityExceeded` if the words cannot be addressed or allocated on this host.
    pub fn new(num_bits: u64) -> Result<Self, Error> {
        if num_bits == 0 {
            return Err(
                Error::invalid_parameters("num_bits must be at least 1").with_context("num_bits", 0)
            );
        }

        let num_words = usize::try_from(num_bits.div_ceil(WORD_BITS))
            .map_err(|_| Error::capacity_exceeded(num_bits, "word count overflows usize"))?;
        if num_words > isize::MAX as usize / std::mem::size_of::<u64>() {
            return Err(Error::capacity_exceeded(
                num_bits,
                "bit array exceeds the addressable size",
            )
            .with_context("num_words", num_words));
        }

        let mut words = Vec::new();
        words.try_reserve_exact(num_words).map_err(|err| {
            Error::capacity_exceeded(num_bits, err).with_context("num_words", num_words)
        })?;
        words.resize(num_words, 0);

        Ok(BitArray { num_bits, words })
    }

    /// Sets the bit at `offset`, returning `true` if it was previously unset.
    #[inline]
    pub fn set_bit(&mut self, offset: u64) -> bool {
        debug_assert!(offset < self.num_bits, "bit offset {offset} out of range");
        let (index, mask) = locate(offset);
        let word = &mut self.words[index];
        let was_unset = *word & mask == 0;
        *word |= mask;
        was_unset
    }

    /// Returns whether the bit at `offset` is set.
    #[inline]
    pub fn get_bit(&self, offset: u64) -> bool {
        debug_assert!(offset < self.num_bits, "bit offset {offset} out of range");
        let (index, mask) = locate(offset);
        self.words[index] & mask != 0
    }

    /// Zeroes every word in place.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Counts the bits set to 1.
    pub fn count_ones(&self) -> u64 {
        self.words.iter().map(|w| u64::from(w.count_ones())).sum()
    }

    /// Returns the logical length in bits.
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Returns the backing words.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Combines `other` into `self` word by word, returning the new count of set bits.
    pub(crate) fn merge_with(&mut self, other: &BitArray, op: impl Fn(u64, u64) -> u64) -> u64 {
        debug_assert_eq!(self.num_bits, other.num_bits);
        let mut num_bits_set = 0;
        for (word, other_word) in self.words.iter_mut().zip(&other.words) {
            *word = op(*word, *other_word);
            num_bits_set += u64::from(word.count_ones());
        }
        num_bits_set
    }
}

/// Word index and in-word mask of a bit offset.
#[inline]
fn locate(offset: u64) -> (usize, u64) {
    let index = (offset >> LOG_WORD_BITS) as usize;
    let mask = 1u64 << (offset & (WORD_BITS - 1));
    (index, mask)
}

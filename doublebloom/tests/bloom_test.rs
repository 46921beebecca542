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

mod common;

use common::put_varint;
use common::varint_key;
use doublebloom::bloom::BloomFilter;
use doublebloom::error::ErrorKind;
use doublebloom::hash::DoubleHasher;
use doublebloom::hash::FnvPair;
use doublebloom::hash::MurmurSplit;
use googletest::assert_that;
use googletest::prelude::eq;
use googletest::prelude::le;

const NUM_BITS: u64 = 10_000_000;
const NUM_HASHES: u64 = 5;
const NUM_KEYS: i64 = 1_000_000;

/// Inserts the even keys below `NUM_KEYS`, then returns the count of false negatives over
/// the even keys and false positives over the odd keys.
fn even_odd_counts<H: DoubleHasher>(filter: &mut BloomFilter<H>) -> (u64, u64) {
    for i in (0..NUM_KEYS).step_by(2) {
        filter.insert(varint_key(i));
    }

    let false_negatives = (0..NUM_KEYS)
        .step_by(2)
        .filter(|&i| !filter.contains(varint_key(i)))
        .count() as u64;
    let false_positives = (1..NUM_KEYS)
        .step_by(2)
        .filter(|&i| filter.contains(varint_key(i)))
        .count() as u64;
    (false_negatives, false_positives)
}

#[test]
fn test_varint_encoding() {
    let mut buf = [0u8; 10];
    assert_eq!(put_varint(&mut buf, 0), 1);
    assert_eq!(buf[0], 0);
    assert_eq!(put_varint(&mut buf, -1), 1);
    assert_eq!(buf[0], 1);
    assert_eq!(put_varint(&mut buf, 64), 2);
    assert_eq!(&buf[..2], &[0x80, 0x01]);
    assert_eq!(varint_key(2), [4, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_false_rate_default_hasher() {
    let mut filter = BloomFilter::new(NUM_BITS, NUM_HASHES).unwrap();
    let (false_negatives, false_positives) = even_odd_counts(&mut filter);
    assert_that!(false_negatives, eq(0));

    let num_inserted = (NUM_KEYS / 2) as u64;
    let fpr = false_positives as f64 / num_inserted as f64;
    let estimated = filter.estimate_fpr(num_inserted);
    // allow statistical slack over the analytic rate
    assert_that!(fpr, le(estimated * 1.2));
}

#[test]
fn test_false_rate_fnv_pair() {
    let mut filter = BloomFilter::with_hasher(NUM_BITS, NUM_HASHES, FnvPair).unwrap();
    let (false_negatives, false_positives) = even_odd_counts(&mut filter);
    assert_that!(false_negatives, eq(0));

    let fpr = false_positives as f64 / NUM_KEYS as f64;
    assert_that!(fpr, le(filter.estimate_fpr(NUM_KEYS as u64)));
}

#[test]
fn test_false_rate_murmur_split() {
    let mut filter =
        BloomFilter::with_hasher(NUM_BITS, NUM_HASHES, MurmurSplit::default()).unwrap();
    let (false_negatives, false_positives) = even_odd_counts(&mut filter);
    assert_that!(false_negatives, eq(0));

    let fpr = false_positives as f64 / NUM_KEYS as f64;
    assert_that!(fpr, le(filter.estimate_fpr(NUM_KEYS as u64)));
}

#[test]
fn test_contains_is_deterministic() {
    let mut filter = BloomFilter::new(1 << 12, 4).unwrap();
    for i in 0..300 {
        filter.insert(varint_key(i));
    }

    for i in 0..600 {
        let first = filter.contains(varint_key(i));
        for _ in 0..5 {
            assert_eq!(filter.contains(varint_key(i)), first, "key {i}");
        }
    }
}

#[test]
fn test_same_inserts_same_bits() {
    let mut f1 = BloomFilter::new(1 << 12, 4).unwrap();
    let mut f2 = BloomFilter::new(1 << 12, 4).unwrap();
    for i in 0..300 {
        f1.insert(varint_key(i));
    }
    for i in (0..300).rev() {
        f2.insert(varint_key(i));
    }
    assert_eq!(f1.words(), f2.words());
    assert_eq!(f1, f2);
}

#[test]
fn test_clear_resets_fully() {
    let mut filter = BloomFilter::new(1 << 14, 6).unwrap();
    for i in 0..1_000 {
        filter.insert(varint_key(i));
    }
    assert!(!filter.is_empty());

    filter.clear();
    assert!(filter.is_empty());
    assert_eq!(filter.bits_used(), 0);
    assert!(filter.words().iter().all(|&w| w == 0));
    assert_eq!(filter, BloomFilter::new(1 << 14, 6).unwrap());
    for i in 0..1_000 {
        assert!(!filter.contains(varint_key(i)), "key {i} survived clear");
    }

    // still usable afterwards
    filter.insert(varint_key(7));
    assert!(filter.contains(varint_key(7)));
    assert_eq!(filter.num_bits(), 1 << 14);
    assert_eq!(filter.num_hashes(), 6);
}

#[test]
fn test_insert_is_idempotent() {
    let mut once = BloomFilter::new(256, 7).unwrap();
    once.insert("element");

    let mut twice = BloomFilter::new(256, 7).unwrap();
    twice.insert("element");
    let after_first = twice.words().to_vec();
    twice.insert("element");

    assert_eq!(twice.words(), after_first.as_slice());
    assert_eq!(twice.words(), once.words());
    assert_eq!(twice.bits_used(), once.bits_used());
}

#[test]
fn test_degenerate_construction_rejected() {
    for (num_bits, num_hashes) in [(0, 5), (1024, 0), (0, 0)] {
        let err = BloomFilter::new(num_bits, num_hashes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameters);
    }
}

#[test]
fn test_oversized_construction_reported() {
    let err = BloomFilter::new(u64::MAX, 3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
}

#[test]
fn test_huge_hash_values_stay_in_range() {
    // offsets only reduce modulo m, so wrapping near u64::MAX must stay in bounds
    let hasher = |_: &[u8]| (u64::MAX, u64::MAX - 1);
    let mut filter = BloomFilter::with_hasher(1_000_003, 64, hasher).unwrap();
    filter.insert("wrap");
    assert!(filter.contains("wrap"));
    assert!(filter.bit_indices("wrap").all(|offset| offset < 1_000_003));
}

#[test]
fn test_estimate_fpr_bounds() {
    let filter = BloomFilter::new(NUM_BITS, NUM_HASHES).unwrap();
    assert_eq!(filter.estimate_fpr(0), 0.0);
    let fpr = filter.estimate_fpr(500_000);
    assert!(fpr > 0.0 && fpr < 0.001);
    assert!(filter.estimate_fpr(u64::MAX) <= 1.0);
}

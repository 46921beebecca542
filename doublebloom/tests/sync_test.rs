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

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use common::varint_key;
use doublebloom::bloom::BloomFilter;
use doublebloom::bloom::SyncBloomFilter;
use doublebloom::hash::FnvPair;

#[test]
fn test_concurrent_inserts_have_no_false_negatives() {
    let filter = SyncBloomFilter::new(BloomFilter::new(1 << 20, 5).unwrap());

    std::thread::scope(|s| {
        for t in 0..8i64 {
            let filter = &filter;
            s.spawn(move || {
                for i in 0..5_000 {
                    filter.insert(varint_key(t * 5_000 + i));
                }
            });
        }
    });

    for i in 0..40_000 {
        assert!(filter.contains(varint_key(i)), "key {i} missing");
    }
}

#[test]
fn test_readers_see_prior_inserts_during_writes() {
    let filter = SyncBloomFilter::new(BloomFilter::with_hasher(1 << 20, 4, FnvPair).unwrap());
    for i in 0..1_000 {
        filter.insert(varint_key(i));
    }
    let done = AtomicBool::new(false);

    std::thread::scope(|s| {
        for _ in 0..4 {
            let (filter, done) = (&filter, &done);
            s.spawn(move || {
                while !done.load(Ordering::Acquire) {
                    for i in 0..1_000 {
                        assert!(filter.contains(varint_key(i)));
                    }
                }
            });
        }

        for i in 1_000..20_000 {
            filter.insert(varint_key(i));
        }
        done.store(true, Ordering::Release);
    });

    let inner = filter.into_inner();
    assert!((0..20_000).all(|i| inner.contains(varint_key(i))));
}

#[test]
fn test_concurrent_contains_and_insert_claims_once() {
    let filter = SyncBloomFilter::new(BloomFilter::new(1 << 20, 5).unwrap());
    let claimed: usize = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let filter = &filter;
                s.spawn(move || {
                    (0..2_000)
                        .filter(|&i| !filter.contains_and_insert(varint_key(i)))
                        .count()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    // a key can be claimed at most once; false positives can only lower the count
    assert!(claimed <= 2_000);
    assert!(claimed > 1_900);
}

#[test]
fn test_clear_while_shared() {
    let filter = SyncBloomFilter::new(BloomFilter::new(1 << 12, 3).unwrap());
    filter.insert("a");
    let other = {
        let mut f = BloomFilter::new(1 << 12, 3).unwrap();
        f.insert("b");
        f
    };
    filter.union(&other).unwrap();
    assert!(filter.contains("a") && filter.contains("b"));

    filter.clear();
    assert!(filter.is_empty());
    assert_eq!(filter.bits_used(), 0);
    assert_eq!(filter.estimate_fpr(0), 0.0);
}

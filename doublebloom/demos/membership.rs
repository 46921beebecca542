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

use doublebloom::bloom::sizing;
use doublebloom::bloom::BloomFilterBuilder;
use doublebloom::hash::FnvPair;

fn main() {
    // Plan parameters for 100,000 items at 0.1% false positives
    let n = 100_000u64;
    let target = 0.001;
    let bits = sizing::optimal_num_bits(n as f64, target);
    let k = sizing::optimal_k(bits, n as f64);
    println!("m = {bits:.0} bits, k* = {k:.2}");

    let mut filter = BloomFilterBuilder::with_accuracy(n, target)
        .build()
        .expect("valid parameters");
    println!(
        "Created filter: m = {}, k = {}",
        filter.num_bits(),
        filter.num_hashes()
    );

    println!("\nInserting {n} even numbers...");
    for i in (0..2 * n).step_by(2) {
        filter.insert(i.to_le_bytes());
    }

    let false_positives = (1..2 * n)
        .step_by(2)
        .filter(|i| filter.contains(i.to_le_bytes()))
        .count();
    println!(
        "Measured FPR: {:.4}%, planned FPR: {:.4}%, occupancy FPR: {:.4}%",
        false_positives as f64 / n as f64 * 100.0,
        filter.estimate_fpr(n) * 100.0,
        filter.current_fpr() * 100.0
    );
    println!("Estimated distinct items: {:.0}", filter.estimated_len());

    // Same sizing, different hash family
    let mut fnv = BloomFilterBuilder::with_accuracy(n, target)
        .hasher(FnvPair)
        .build()
        .expect("valid parameters");
    fnv.insert("hello");
    println!("\nFNV filter contains \"hello\": {}", fnv.contains("hello"));

    filter.clear();
    println!("After clear, load factor = {}", filter.load_factor());
}

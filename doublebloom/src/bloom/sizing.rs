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

//! Pure functions for choosing filter parameters.
//!
//! All inputs are `f64` so they can be evaluated for fractional hash counts, which is
//! how the optimum is usually reported before rounding.

use std::f64::consts::LN_2;

/// Hash count minimizing the false positive rate for `num_bits` bits and `num_items` items.
///
/// Formula: `k = ln(2) * m / n`
///
/// # Examples
///
/// ```
/// # use doublebloom::bloom::sizing::optimal_k;
/// let k = optimal_k(10_000.0, 1_000.0);
/// assert!((k - 6.93).abs() < 0.01);
/// ```
pub fn optimal_k(num_bits: f64, num_items: f64) -> f64 {
    LN_2 * num_bits / num_items
}

/// Analytic false positive rate after inserting `num_items` distinct items.
///
/// Formula: `p = (1 - e^(-k * n / m))^k`
///
/// Assumes independent, uniformly distributed bit positions.
pub fn estimated_fpr(num_bits: f64, num_items: f64, num_hashes: f64) -> f64 {
    (1.0 - (-num_hashes * num_items / num_bits).exp()).powf(num_hashes)
}

/// Bit count needed to hold `num_items` items at false positive rate `fpr`, assuming the
/// optimal hash count is then used.
///
/// Formula: `m = -n * ln(p) / ln(2)^2`
///
/// # Examples
///
/// ```
/// # use doublebloom::bloom::sizing::optimal_num_bits;
/// let bits = optimal_num_bits(1_000.0, 0.01);
/// assert!(bits > 9_000.0 && bits < 10_000.0); // ~9585 bits
/// ```
pub fn optimal_num_bits(num_items: f64, fpr: f64) -> f64 {
    -num_items * fpr.ln() / (LN_2 * LN_2)
}

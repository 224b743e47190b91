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

//! HyperLogLog cardinality estimation.
//!
//! A sketch of `m = 2^b` buckets, `b` in `[4, 20]`. Each key's 64-bit hash is
//! split into a bucket index (low `b` bits) and a run-length statistic over
//! the remaining bits; each bucket keeps the maximum run length observed. The
//! estimate combines the harmonic mean of the bucket statistics with a bias
//! constant `alpha(b)` and small/large range corrections.
//!
//! Merging is an elementwise maximum of bucket arrays: an exact, lossless
//! union that is commutative, associative, and idempotent, so partial
//! sketches built by independent workers can be reduced in any order or
//! fan-in shape.
//!
//! Two storage variants share the estimator math in this module:
//!
//! - [`HyperLogLogCounter`] owns its bucket array on the heap.
//! - [`HyperLogLogPlacementCounter`] aliases two caller-owned byte regions as
//!   its bucket array and allocates nothing, so its live state can sit inside
//!   a host engine's fixed-size aggregation slot with no serialize round trip
//!   per update.

mod placement;
mod sketch;

pub use self::placement::HyperLogLogPlacementCounter;
pub use self::sketch::HyperLogLogCounter;

/// Inclusive bounds the precision parameter b is clamped to.
pub const MIN_B: u32 = 4;
pub const MAX_B: u32 = 20;

pub(crate) const BUCKET_BYTES: usize = 4;

const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

pub(crate) fn clamp_b(b: u32) -> u32 {
    b.clamp(MIN_B, MAX_B)
}

/// Bias-correction constant for m = 2^b buckets.
///
/// Fixed constants for the three smallest sizes, the asymptotic formula
/// otherwise.
pub(crate) fn alpha(b: u32) -> f64 {
    match b {
        4 => 0.673,
        5 => 0.697,
        6 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / (1u64 << b) as f64),
    }
}

/// Run-length statistic for the non-index bits of a hash.
///
/// Counts the consecutive one bits from the least significant end. The extra
/// +1 is an empirical bias adjustment inherited from the original estimator;
/// the range corrections in [`estimate`] are tuned against it, so it must not
/// be "fixed" independently.
pub(crate) fn run_length(w: u64) -> u32 {
    w.trailing_ones() + 1
}

/// Raw HyperLogLog estimate with small- and large-range corrections applied.
///
/// Single pass over the bucket statistics; allocation-free so the placement
/// variant can call it against aliased storage.
pub(crate) fn estimate(b: u32, m: usize, buckets: impl Iterator<Item = u32>) -> u64 {
    let mut harmonic_sum = 0.0f64;
    let mut zero_buckets = 0usize;
    for bucket in buckets {
        harmonic_sum += (-(bucket as f64)).exp2();
        if bucket == 0 {
            zero_buckets += 1;
        }
    }

    let m_f = m as f64;
    let mut e = alpha(b) * m_f * m_f / harmonic_sum;
    if e < 2.5 * m_f {
        // Small-range correction: fall back to linear counting over the
        // empty buckets.
        if zero_buckets > 0 {
            e = m_f * (m_f / zero_buckets as f64).ln();
        }
    } else if e > TWO_POW_64 / 30.0 {
        // Large-range correction: compensate for 64-bit hash collisions.
        e = -TWO_POW_64 * (1.0 - e / TWO_POW_64).ln();
    }
    e.round() as u64
}

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

use std::fmt;

use crate::error::Error;
use crate::hash::hash_key;
use crate::hll::clamp_b;
use crate::hll::estimate;
use crate::hll::run_length;
use crate::hll::MAX_B;
use crate::hll::MIN_B;
use crate::serializer::Serializer;

/// HyperLogLog estimator owning its bucket array.
///
/// The bucket count `m = 2^b` is immutable after construction, except through
/// [`unserialize`](Self::unserialize), which adopts the serialized geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperLogLogCounter {
    b: u32,
    m: usize,
    m_mask: u64,
    buckets: Vec<u32>,
}

impl HyperLogLogCounter {
    /// Creates a counter with `2^b` zeroed buckets, clamping `b` to
    /// `[4, 20]`.
    pub fn new(b: u32) -> Self {
        let b = clamp_b(b);
        let m = 1usize << b;
        HyperLogLogCounter {
            b,
            m,
            m_mask: (m - 1) as u64,
            buckets: vec![0u32; m],
        }
    }

    /// Returns the precision parameter b.
    pub fn b(&self) -> u32 {
        self.b
    }

    /// Returns the number of buckets m.
    pub fn m(&self) -> usize {
        self.m
    }

    /// Returns the bucket array.
    pub fn buckets(&self) -> &[u32] {
        &self.buckets
    }

    /// Records one key. Repeated keys cannot lower or raise a bucket past
    /// its maximum, so the update is idempotent.
    pub fn increment(&mut self, key: &[u8]) {
        self.increment_hashed(hash_key(key));
    }

    /// Records a pre-hashed key.
    pub fn increment_hashed(&mut self, hash: u64) {
        let j = (hash & self.m_mask) as usize;
        let run = run_length(hash >> self.b);
        if run > self.buckets[j] {
            self.buckets[j] = run;
        }
    }

    /// Estimates the number of distinct keys observed.
    pub fn count(&self) -> u64 {
        estimate(self.b, self.m, self.buckets.iter().copied())
    }

    /// Takes the elementwise maximum of the two bucket arrays.
    ///
    /// This is an exact union of the two sketches. Fails with
    /// `ParameterMismatch` if the bucket counts differ, leaving this counter
    /// unmodified.
    pub fn merge_from(&mut self, other: &HyperLogLogCounter) -> Result<(), Error> {
        if self.m != other.m {
            return Err(Error::parameter_mismatch("m", self.m, other.m));
        }
        for (dst, src) in self.buckets.iter_mut().zip(other.buckets.iter()) {
            if *src > *dst {
                *dst = *src;
            }
        }
        Ok(())
    }

    /// Returns an empty counter of identical configuration.
    pub fn fresh(&self) -> Self {
        Self::new(self.b)
    }

    /// Writes b, m, and m_mask (u32 each), then every bucket as a u32,
    /// m values total.
    pub fn serialize(&self, ser: &mut Serializer<'_>) -> Result<(), Error> {
        ser.write_u32(self.b)?;
        ser.write_u32(self.m as u32)?;
        ser.write_u32(self.m_mask as u32)?;
        for bucket in &self.buckets {
            ser.write_u32(*bucket)?;
        }
        Ok(())
    }

    /// Reads back the layout written by [`serialize`](Self::serialize),
    /// resizing the bucket array to the serialized m.
    pub fn unserialize(&mut self, ser: &mut Serializer<'_>) -> Result<(), Error> {
        let (b, m, m_mask) = read_geometry(ser)?;
        let mut buckets = vec![0u32; m];
        for bucket in buckets.iter_mut() {
            *bucket = ser.read_u32()?;
        }
        self.b = b;
        self.m = m;
        self.m_mask = m_mask;
        self.buckets = buckets;
        Ok(())
    }
}

impl fmt::Display for HyperLogLogCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HyperLogLogCounter(b={})", self.b)
    }
}

/// Reads and validates the b/m/m_mask header shared by both storage variants.
pub(crate) fn read_geometry(ser: &mut Serializer<'_>) -> Result<(u32, usize, u64), Error> {
    let b = ser.read_u32()?;
    let m = ser.read_u32()? as usize;
    let m_mask = ser.read_u32()? as u64;
    if !(MIN_B..=MAX_B).contains(&b) {
        return Err(Error::invalid_data(format!("serialized b {b} out of range")));
    }
    if m != 1usize << b || m_mask != (m - 1) as u64 {
        return Err(Error::invalid_data(format!(
            "inconsistent serialized geometry: b={b} m={m} m_mask={m_mask}"
        )));
    }
    Ok((b, m, m_mask))
}

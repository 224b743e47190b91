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

use byteorder::ByteOrder;
use byteorder::NativeEndian;

use crate::error::Error;
use crate::hash::hash_key;
use crate::hll::clamp_b;
use crate::hll::estimate;
use crate::hll::run_length;
use crate::hll::sketch::read_geometry;
use crate::hll::BUCKET_BYTES;
use crate::serializer::Serializer;

/// HyperLogLog estimator aliasing caller-owned storage.
///
/// Behaves exactly like
/// [`HyperLogLogCounter`](crate::hll::HyperLogLogCounter), but holds no
/// memory of its own: the bucket array lives inside two externally owned byte
/// regions supplied at construction, 4 native-endian bytes per bucket. Every
/// operation, including [`count`](Self::count) and
/// [`merge_from`](Self::merge_from), is allocation-free and works directly on
/// the aliased memory, so live sketch state can sit inside a host engine's
/// fixed-size aggregation slot without a serialize/unserialize round trip per
/// update.
///
/// A bucket never straddles the boundary between the two regions; a front
/// region whose length is not a multiple of 4 has its tail bytes unused.
///
/// The counter borrows the regions for `'a` and is unusable once they are
/// gone; dropping the counter never releases them.
pub struct HyperLogLogPlacementCounter<'a> {
    b: u32,
    m: usize,
    m_mask: u64,
    front: &'a mut [u8],
    back: &'a mut [u8],
}

impl<'a> HyperLogLogPlacementCounter<'a> {
    /// Creates a counter with `2^b` buckets (b clamped to `[4, 20]`) over the
    /// two regions, zeroing the bucket bytes.
    ///
    /// Fails with `StorageExhausted` if the regions cannot hold the buckets.
    pub fn new(b: u32, front: &'a mut [u8], back: &'a mut [u8]) -> Result<Self, Error> {
        let mut counter = Self::attach(b, front, back)?;
        for j in 0..counter.m {
            counter.set_bucket(j, 0);
        }
        Ok(counter)
    }

    /// Wraps regions that already hold bucket state from a previous
    /// `HyperLogLogPlacementCounter` of the same geometry, without touching
    /// their contents.
    ///
    /// This is the cross-call reuse path: a host engine reconstructs the
    /// counter over its persistent slot on every invocation and keeps
    /// incrementing where the previous invocation left off.
    ///
    /// Fails with `StorageExhausted` if the regions cannot hold the buckets.
    pub fn attach(b: u32, front: &'a mut [u8], back: &'a mut [u8]) -> Result<Self, Error> {
        let b = clamp_b(b);
        let m = 1usize << b;
        let available = front.len() / BUCKET_BYTES + back.len() / BUCKET_BYTES;
        if available < m {
            return Err(Error::storage_exhausted(
                0,
                front.len() + back.len(),
                m * BUCKET_BYTES,
            ));
        }
        Ok(HyperLogLogPlacementCounter {
            b,
            m,
            m_mask: (m - 1) as u64,
            front,
            back,
        })
    }

    /// Returns the precision parameter b.
    pub fn b(&self) -> u32 {
        self.b
    }

    /// Returns the number of buckets m.
    pub fn m(&self) -> usize {
        self.m
    }

    fn bucket(&self, j: usize) -> u32 {
        let front_buckets = self.front.len() / BUCKET_BYTES;
        if j < front_buckets {
            NativeEndian::read_u32(&self.front[j * BUCKET_BYTES..])
        } else {
            NativeEndian::read_u32(&self.back[(j - front_buckets) * BUCKET_BYTES..])
        }
    }

    fn set_bucket(&mut self, j: usize, value: u32) {
        let front_buckets = self.front.len() / BUCKET_BYTES;
        if j < front_buckets {
            NativeEndian::write_u32(&mut self.front[j * BUCKET_BYTES..], value);
        } else {
            NativeEndian::write_u32(&mut self.back[(j - front_buckets) * BUCKET_BYTES..], value);
        }
    }

    /// Records one key.
    pub fn increment(&mut self, key: &[u8]) {
        self.increment_hashed(hash_key(key));
    }

    /// Records a pre-hashed key.
    pub fn increment_hashed(&mut self, hash: u64) {
        let j = (hash & self.m_mask) as usize;
        let run = run_length(hash >> self.b);
        if run > self.bucket(j) {
            self.set_bucket(j, run);
        }
    }

    /// Estimates the number of distinct keys observed.
    pub fn count(&self) -> u64 {
        estimate(self.b, self.m, (0..self.m).map(|j| self.bucket(j)))
    }

    /// Takes the elementwise maximum of the two bucket arrays.
    ///
    /// Fails with `ParameterMismatch` if the bucket counts differ, leaving
    /// this counter unmodified.
    pub fn merge_from(&mut self, other: &HyperLogLogPlacementCounter<'_>) -> Result<(), Error> {
        if self.m != other.m {
            return Err(Error::parameter_mismatch("m", self.m, other.m));
        }
        for j in 0..self.m {
            let theirs = other.bucket(j);
            if theirs > self.bucket(j) {
                self.set_bucket(j, theirs);
            }
        }
        Ok(())
    }

    /// Writes the same layout as the owning variant: b, m, m_mask (u32 each),
    /// then every bucket as a u32.
    pub fn serialize(&self, ser: &mut Serializer<'_>) -> Result<(), Error> {
        ser.write_u32(self.b)?;
        ser.write_u32(self.m as u32)?;
        ser.write_u32(self.m_mask as u32)?;
        for j in 0..self.m {
            ser.write_u32(self.bucket(j))?;
        }
        Ok(())
    }

    /// Reads back the serialized layout into the aliased regions.
    ///
    /// The serialized geometry may differ from the current one as long as the
    /// backing regions can hold it; otherwise fails with `StorageExhausted`.
    /// Any failure, including a snapshot truncated short of its full bucket
    /// array, is detected before the first bucket is written, so the aliased
    /// regions never end up holding a half-replaced state.
    pub fn unserialize(&mut self, ser: &mut Serializer<'_>) -> Result<(), Error> {
        let (b, m, m_mask) = read_geometry(ser)?;
        let available = self.front.len() / BUCKET_BYTES + self.back.len() / BUCKET_BYTES;
        if available < m {
            return Err(Error::storage_exhausted(
                0,
                self.front.len() + self.back.len(),
                m * BUCKET_BYTES,
            ));
        }
        // The buckets are written straight into the caller's regions, so the
        // whole array must be readable before the first write.
        if ser.remaining_spans(BUCKET_BYTES) < m {
            return Err(Error::storage_exhausted(
                ser.size(),
                ser.capacity(),
                m * BUCKET_BYTES,
            ));
        }
        self.b = b;
        self.m = m;
        self.m_mask = m_mask;
        for j in 0..m {
            let bucket = ser.read_u32()?;
            self.set_bucket(j, bucket);
        }
        Ok(())
    }
}

impl fmt::Display for HyperLogLogPlacementCounter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HyperLogLogPlacementCounter(b={})", self.b)
    }
}

impl fmt::Debug for HyperLogLogPlacementCounter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperLogLogPlacementCounter")
            .field("b", &self.b)
            .field("m", &self.m)
            .field("front_len", &self.front.len())
            .field("back_len", &self.back.len())
            .finish()
    }
}

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

use std::collections::BinaryHeap;
use std::fmt;

use crate::error::Error;
use crate::hash::hash_key;
use crate::serializer::Serializer;

const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// K-minimum-values distinct-count estimator.
///
/// Holds at most `k` of the smallest hash values observed, in a max-heap so
/// the current "max of the minimums" is always at the root. Two distinct keys
/// hashing to the same value are stored twice; this double-counting is a
/// known approximation limitation.
#[derive(Debug, Clone)]
pub struct KMinValuesCounter {
    k: usize,
    minimal_values: BinaryHeap<u64>,
}

impl KMinValuesCounter {
    /// Creates an empty counter retaining up to `k` minimal hash values.
    ///
    /// # Panics
    ///
    /// Panics if `k` is 0.
    pub fn new(k: usize) -> Self {
        assert!(k > 0, "k must be at least 1");
        KMinValuesCounter {
            k,
            minimal_values: BinaryHeap::with_capacity(k),
        }
    }

    /// Returns the configured capacity k.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the number of values currently stored (the "effective k"
    /// while fewer than k values have been observed).
    pub fn stored(&self) -> usize {
        self.minimal_values.len()
    }

    /// Returns the largest of the stored minimal values, if any.
    pub fn max_of_min(&self) -> Option<u64> {
        self.minimal_values.peek().copied()
    }

    /// Records one key.
    pub fn increment(&mut self, key: &[u8]) {
        self.increment_hashed(hash_key(key));
    }

    /// Records a pre-hashed key.
    pub fn increment_hashed(&mut self, hash: u64) {
        self.insert(hash);
    }

    // Shared insert policy for increment and merge: keep the k smallest,
    // evicting the current maximum when a smaller value arrives.
    fn insert(&mut self, hash: u64) {
        if self.minimal_values.len() < self.k {
            self.minimal_values.push(hash);
            return;
        }
        if hash < *self.minimal_values.peek().unwrap() {
            self.minimal_values.pop();
            self.minimal_values.push(hash);
        }
    }

    /// Estimates the number of distinct keys observed.
    ///
    /// With `k' = min(k, stored)` values retained, the estimate is
    /// `round(2^64 * (k' - 1) / max_of_min)`; an empty counter returns 0.
    pub fn count(&self) -> u64 {
        let effective_k = self.k.min(self.minimal_values.len());
        if effective_k == 0 {
            return 0;
        }
        let max_of_min = *self.minimal_values.peek().unwrap();
        (TWO_POW_64 * (effective_k - 1) as f64 / max_of_min as f64).round() as u64
    }

    /// Drains `other` into this counter.
    ///
    /// **Destructive and asymmetric**: the left-hand side is mutated and
    /// retained; the right-hand side is consumed (emptied) and must not be
    /// used afterward. Fails with `ParameterMismatch` before draining
    /// anything if the capacities differ.
    pub fn merge_from(&mut self, other: &mut KMinValuesCounter) -> Result<(), Error> {
        if self.k != other.k {
            return Err(Error::parameter_mismatch("k", self.k, other.k));
        }
        while let Some(value) = other.minimal_values.pop() {
            self.insert(value);
        }
        Ok(())
    }

    /// Returns an empty counter of identical configuration.
    pub fn fresh(&self) -> Self {
        Self::new(self.k)
    }

    /// Writes k (u32), the stored count (u32), then each stored value (u64)
    /// in heap-pop order, i.e. descending.
    ///
    /// Descending order is the canonical wire format: pushing the values back
    /// in that order rebuilds an observably identical heap, so a round trip
    /// preserves structure, not just the estimate.
    pub fn serialize(&self, ser: &mut Serializer<'_>) -> Result<(), Error> {
        ser.write_u32(self.k as u32)?;
        ser.write_u32(self.minimal_values.len() as u32)?;
        let mut draining = self.minimal_values.clone();
        while let Some(value) = draining.pop() {
            ser.write_u64(value)?;
        }
        Ok(())
    }

    /// Reads back the layout written by [`serialize`](Self::serialize),
    /// replacing any existing state.
    pub fn unserialize(&mut self, ser: &mut Serializer<'_>) -> Result<(), Error> {
        let k = ser.read_u32()? as usize;
        let stored = ser.read_u32()? as usize;
        if k == 0 {
            return Err(Error::invalid_data("serialized k is 0"));
        }
        if stored > k {
            return Err(Error::invalid_data(format!(
                "serialized value count {stored} exceeds k {k}"
            )));
        }

        let mut minimal_values = BinaryHeap::with_capacity(k);
        for _ in 0..stored {
            minimal_values.push(ser.read_u64()?);
        }
        self.k = k;
        self.minimal_values = minimal_values;
        Ok(())
    }
}

impl fmt::Display for KMinValuesCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KMinValuesCounter(k={})", self.k)
    }
}

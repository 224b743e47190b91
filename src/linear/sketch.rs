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
use crate::serializer::Serializer;

const WORD_BITS: usize = 64;

/// Linear probabilistic distinct-count estimator backed by a fixed bitset.
///
/// The bitset size never changes after construction, except through
/// [`unserialize`](Self::unserialize), which adopts the serialized size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearProbabilisticCounter {
    size_in_bits: usize,
    words: Vec<u64>,
}

impl LinearProbabilisticCounter {
    /// Creates a counter with all `size_in_bits` bits cleared.
    ///
    /// # Panics
    ///
    /// Panics if `size_in_bits` is 0.
    pub fn new(size_in_bits: usize) -> Self {
        assert!(size_in_bits > 0, "size_in_bits must be at least 1");
        LinearProbabilisticCounter {
            size_in_bits,
            words: vec![0u64; words_for(size_in_bits)],
        }
    }

    /// Returns the configured bitset size in bits.
    pub fn size_in_bits(&self) -> usize {
        self.size_in_bits
    }

    /// Records one key. Idempotent for repeated keys.
    pub fn increment(&mut self, key: &[u8]) {
        self.increment_hashed(hash_key(key));
    }

    /// Records a pre-hashed key, setting bit `hash % size_in_bits`.
    pub fn increment_hashed(&mut self, hash: u64) {
        let i = (hash % self.size_in_bits as u64) as usize;
        self.words[i / WORD_BITS] |= 1u64 << (i % WORD_BITS);
    }

    /// Returns the number of set bits.
    pub fn count_set_bits(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Estimates the number of distinct keys observed.
    ///
    /// Returns `round(-n * ln(unset/n))`. When every bit is set the counter
    /// is saturated and returns `size_in_bits`; precision is lost beyond that
    /// point, which is a documented limitation rather than an error.
    pub fn count(&self) -> u64 {
        let unset_bits = self.size_in_bits - self.count_set_bits();
        if unset_bits == 0 {
            return self.size_in_bits as u64;
        }
        let ratio = unset_bits as f64 / self.size_in_bits as f64;
        (-(self.size_in_bits as f64) * ratio.ln()).round() as u64
    }

    /// ORs `other`'s bitset into this one.
    ///
    /// Fails with `ParameterMismatch` if the sizes differ, leaving this
    /// counter unmodified.
    pub fn merge_from(&mut self, other: &LinearProbabilisticCounter) -> Result<(), Error> {
        if self.size_in_bits != other.size_in_bits {
            return Err(Error::parameter_mismatch(
                "size_in_bits",
                self.size_in_bits,
                other.size_in_bits,
            ));
        }
        for (dst, src) in self.words.iter_mut().zip(other.words.iter()) {
            *dst |= *src;
        }
        Ok(())
    }

    /// Returns an empty counter of identical configuration.
    ///
    /// This is the lifecycle operation a host engine uses to start a new
    /// partial aggregate shaped like an existing one. For a deep copy of
    /// state, use [`Clone`].
    pub fn fresh(&self) -> Self {
        Self::new(self.size_in_bits)
    }

    /// Writes `size_in_bits` (u32) followed by the bitset packed into 64-bit
    /// words, least-significant bit first. The final partial word is written
    /// in full.
    pub fn serialize(&self, ser: &mut Serializer<'_>) -> Result<(), Error> {
        ser.write_u32(self.size_in_bits as u32)?;
        for word in &self.words {
            ser.write_u64(*word)?;
        }
        Ok(())
    }

    /// Reads back the layout written by [`serialize`](Self::serialize),
    /// resizing the bitset to the serialized size.
    pub fn unserialize(&mut self, ser: &mut Serializer<'_>) -> Result<(), Error> {
        let size_in_bits = ser.read_u32()? as usize;
        if size_in_bits == 0 {
            return Err(Error::invalid_data("serialized size_in_bits is 0"));
        }

        let mut words = vec![0u64; words_for(size_in_bits)];
        for word in words.iter_mut() {
            *word = ser.read_u64()?;
        }
        // Bits past size_in_bits in the final word are not part of the
        // bitset; clear them so structural equality holds after a round trip.
        let tail_bits = size_in_bits % WORD_BITS;
        if tail_bits != 0 {
            *words.last_mut().unwrap() &= (1u64 << tail_bits) - 1;
        }

        self.size_in_bits = size_in_bits;
        self.words = words;
        Ok(())
    }
}

impl fmt::Display for LinearProbabilisticCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LinearProbabilisticCounter(n={})", self.size_in_bits)
    }
}

fn words_for(size_in_bits: usize) -> usize {
    size_in_bits.div_ceil(WORD_BITS)
}

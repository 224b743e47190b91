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

//! Exact baseline counter for differential testing.

use std::fmt;

use crate::error::Error;
use crate::serializer::Serializer;

/// Exact running counter.
///
/// Not a distinct-count estimator: `increment` adds 1 regardless of the key,
/// so repeated keys are counted repeatedly. Its only role is providing ground
/// truth when measuring the statistical counters' error on streams of
/// distinct keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DummyCounter {
    c: u64,
}

impl DummyCounter {
    /// Creates a counter at zero.
    pub fn new() -> Self {
        DummyCounter { c: 0 }
    }

    /// Adds 1; the key is ignored.
    pub fn increment(&mut self, _key: &[u8]) {
        self.c += 1;
    }

    /// Adds 1; the hash is ignored like the key would be.
    pub fn increment_hashed(&mut self, _hash: u64) {
        self.c += 1;
    }

    /// Returns the running total.
    pub fn count(&self) -> u64 {
        self.c
    }

    /// Adds `other`'s total to this one.
    pub fn merge_from(&mut self, other: &DummyCounter) {
        self.c += other.c;
    }

    /// Returns a counter at zero.
    pub fn fresh(&self) -> Self {
        Self::new()
    }

    /// Writes the running total as a single u64.
    pub fn serialize(&self, ser: &mut Serializer<'_>) -> Result<(), Error> {
        ser.write_u64(self.c)
    }

    /// Reads back the total written by [`serialize`](Self::serialize).
    pub fn unserialize(&mut self, ser: &mut Serializer<'_>) -> Result<(), Error> {
        self.c = ser.read_u64()?;
        Ok(())
    }
}

impl fmt::Display for DummyCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DummyCounter(c={})", self.c)
    }
}

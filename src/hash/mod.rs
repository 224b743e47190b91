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

//! Non-cryptographic hashing used by the sketches.
//!
//! All sketches hash keys through [`hash_key`]: MurmurHash3 x64 128 with a
//! fixed seed of 0, keeping the low 64 bits. Two sketches can only be merged
//! meaningfully if they hashed their inputs identically, so the seed is a
//! fixed part of the wire ABI rather than a configuration knob.
//!
//! For unit-testing sketch arithmetic against deterministic synthetic hash
//! sequences, every hashing sketch also accepts pre-hashed values through its
//! `increment_hashed` method, bypassing this module entirely.

mod murmurhash;

pub use self::murmurhash::murmur3_x64_128;

/// The fixed seed shared by all sketches.
pub const SKETCH_SEED: u64 = 0;

/// Maps an arbitrary byte string to a uniform 64-bit value.
pub fn hash_key(key: &[u8]) -> u64 {
    let (h1, _) = murmur3_x64_128(key, SKETCH_SEED);
    h1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_key_is_low_word() {
        let key = b"The quick brown fox jumps over the lazy dog";
        assert_eq!(hash_key(key), 0xe34bbc7bbc071b6c);
    }
}

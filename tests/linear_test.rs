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

use cardsketch::error::ErrorKind;
use cardsketch::linear::LinearProbabilisticCounter;
use cardsketch::serializer::Serializer;
use googletest::assert_that;
use googletest::prelude::near;

#[test]
fn test_fresh_counter_is_zero() {
    for size in [1, 64, 1024, 1_000_000] {
        let counter = LinearProbabilisticCounter::new(size);
        assert_eq!(counter.count(), 0, "size {size}");
    }
}

#[test]
fn test_saturation_returns_size_in_bits() {
    let mut counter = LinearProbabilisticCounter::new(1024);
    // Synthetic hashes 0..1024 hit every bit exactly once.
    for h in 0..1024u64 {
        counter.increment_hashed(h);
    }
    assert_eq!(counter.count_set_bits(), 1024);
    assert_eq!(counter.count(), 1024);
}

#[test]
fn test_estimate_tracks_distinct_keys() {
    let mut counter = LinearProbabilisticCounter::new(1 << 16);
    for i in 0..5_000u32 {
        counter.increment(format!("key-{i}").as_bytes());
    }
    assert_that!(counter.count() as f64, near(5_000.0, 5_000.0 * 0.05));

    // Re-inserting the same keys sets no new bits.
    let estimate = counter.count();
    for i in 0..5_000u32 {
        counter.increment(format!("key-{i}").as_bytes());
    }
    assert_eq!(counter.count(), estimate);
}

#[test]
fn test_merge_is_bitwise_or() {
    let mut left = LinearProbabilisticCounter::new(1 << 14);
    let mut right = LinearProbabilisticCounter::new(1 << 14);
    for i in 0..600u32 {
        left.increment(format!("left-{i}").as_bytes());
    }
    for i in 0..400u32 {
        right.increment(format!("right-{i}").as_bytes());
    }

    // Merge in both directions; OR is commutative so the bitsets agree.
    let mut reversed = right.clone();
    reversed.merge_from(&left).unwrap();
    left.merge_from(&right).unwrap();
    assert_eq!(left, reversed);
    assert_that!(left.count() as f64, near(1_000.0, 1_000.0 * 0.1));
}

#[test]
fn test_merge_is_idempotent() {
    let mut counter = LinearProbabilisticCounter::new(4096);
    for i in 0..100u32 {
        counter.increment(format!("key-{i}").as_bytes());
    }
    let snapshot = counter.clone();
    counter.merge_from(&snapshot).unwrap();
    assert_eq!(counter, snapshot);
}

#[test]
fn test_mismatched_merge_leaves_left_unmodified() {
    let mut left = LinearProbabilisticCounter::new(1024);
    let mut right = LinearProbabilisticCounter::new(2048);
    left.increment(b"a");
    right.increment(b"b");

    let before = left.clone();
    let err = left.merge_from(&right).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParameterMismatch);
    assert_eq!(left, before);
}

#[test]
fn test_serialize_round_trip_is_structural() {
    let mut counter = LinearProbabilisticCounter::new(1000);
    for i in 0..300u32 {
        counter.increment(format!("key-{i}").as_bytes());
    }

    // 4 bytes of header plus 16 words covering 1000 bits.
    let mut region = vec![0u8; 4 + 16 * 8];
    let mut ser = Serializer::new();
    ser.register_region(&mut region);
    counter.serialize(&mut ser).unwrap();

    ser.reset();
    let mut restored = LinearProbabilisticCounter::new(1);
    restored.unserialize(&mut ser).unwrap();

    assert_eq!(restored, counter);
    assert_eq!(restored.count(), counter.count());
    assert_eq!(restored.size_in_bits(), 1000);
}

#[test]
fn test_serialize_without_room_fails() {
    let counter = LinearProbabilisticCounter::new(1024);
    let mut region = [0u8; 16];
    let mut ser = Serializer::new();
    ser.register_region(&mut region);
    let err = counter.serialize(&mut ser).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageExhausted);
}

#[test]
fn test_fresh_is_empty_with_same_size() {
    let mut counter = LinearProbabilisticCounter::new(512);
    counter.increment(b"something");
    let fresh = counter.fresh();
    assert_eq!(fresh.size_in_bits(), 512);
    assert_eq!(fresh.count(), 0);
}

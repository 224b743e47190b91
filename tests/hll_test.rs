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
use cardsketch::hll::HyperLogLogCounter;
use cardsketch::serializer::Serializer;
use googletest::assert_that;
use googletest::prelude::near;

#[test]
fn test_fresh_counter_is_zero() {
    for b in [4, 10, 12, 20] {
        let counter = HyperLogLogCounter::new(b);
        assert_eq!(counter.count(), 0, "b {b}");
    }
}

#[test]
fn test_repeated_key_is_idempotent() {
    let mut counter = HyperLogLogCounter::new(12);
    counter.increment(b"only-key");
    let estimate = counter.count();
    counter.increment(b"only-key");
    assert_eq!(counter.count(), estimate);

    for i in 0..1_000u32 {
        counter.increment(format!("key-{i}").as_bytes());
    }
    let estimate = counter.count();
    for i in 0..1_000u32 {
        counter.increment(format!("key-{i}").as_bytes());
    }
    assert_eq!(counter.count(), estimate);
}

#[test]
fn test_small_range_estimate() {
    let mut counter = HyperLogLogCounter::new(12);
    for i in 0..100u32 {
        counter.increment(format!("key-{i}").as_bytes());
    }
    // Deep in linear-counting territory for m = 4096.
    assert_that!(counter.count() as f64, near(100.0, 10.0));
}

#[test]
fn test_estimate_tracks_distinct_keys() {
    let mut counter = HyperLogLogCounter::new(12);
    for i in 0..50_000u32 {
        counter.increment(format!("key-{i}").as_bytes());
    }
    assert_that!(counter.count() as f64, near(50_000.0, 50_000.0 * 0.1));
}

#[test]
fn test_merge_union_law() {
    let mut a = HyperLogLogCounter::new(10);
    let mut b = HyperLogLogCounter::new(10);
    for i in 0..500u32 {
        a.increment(format!("left-{i}").as_bytes());
    }
    for i in 0..700u32 {
        b.increment(format!("right-{i}").as_bytes());
    }

    // Merge both directions; elementwise max is commutative, so the bucket
    // arrays must be identical.
    let mut ab = a.clone();
    ab.merge_from(&b).unwrap();
    let mut ba = b.clone();
    ba.merge_from(&a).unwrap();
    assert_eq!(ab.buckets(), ba.buckets());

    assert_that!(ab.count() as f64, near(1_200.0, 1_200.0 * 0.1));
}

#[test]
fn test_merge_is_idempotent() {
    let mut counter = HyperLogLogCounter::new(10);
    for i in 0..2_000u32 {
        counter.increment(format!("key-{i}").as_bytes());
    }
    let snapshot = counter.clone();
    counter.merge_from(&snapshot).unwrap();
    assert_eq!(counter, snapshot);
}

#[test]
fn test_merge_is_associative() {
    let make = |prefix: &str, n: u32| {
        let mut counter = HyperLogLogCounter::new(8);
        for i in 0..n {
            counter.increment(format!("{prefix}-{i}").as_bytes());
        }
        counter
    };
    let a = make("a", 300);
    let b = make("b", 400);
    let c = make("c", 500);

    let mut left = a.clone();
    left.merge_from(&b).unwrap();
    left.merge_from(&c).unwrap();

    let mut right = b.clone();
    right.merge_from(&c).unwrap();
    let mut outer = a.clone();
    outer.merge_from(&right).unwrap();

    assert_eq!(left, outer);
}

#[test]
fn test_mismatched_merge_leaves_left_unmodified() {
    let mut left = HyperLogLogCounter::new(10);
    let mut right = HyperLogLogCounter::new(11);
    left.increment(b"a");
    right.increment(b"b");

    let before = left.clone();
    let err = left.merge_from(&right).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParameterMismatch);
    assert_eq!(left, before);
}

#[test]
fn test_serialize_round_trip_is_structural() {
    let mut counter = HyperLogLogCounter::new(10);
    for i in 0..5_000u32 {
        counter.increment(format!("key-{i}").as_bytes());
    }

    let mut region = vec![0u8; 12 + 1024 * 4];
    let mut ser = Serializer::new();
    ser.register_region(&mut region);
    counter.serialize(&mut ser).unwrap();
    assert_eq!(ser.size(), 12 + 1024 * 4);

    ser.reset();
    let mut restored = HyperLogLogCounter::new(4);
    restored.unserialize(&mut ser).unwrap();

    assert_eq!(restored, counter);
    assert_eq!(restored.count(), counter.count());
    assert_eq!(restored.m(), 1024);
}

#[test]
fn test_serialize_across_multiple_regions() {
    // b = 12 needs 12 + 4096 * 4 bytes; split it across three slots the way
    // a host engine's fixed-size intermediate columns would.
    let mut counter = HyperLogLogCounter::new(12);
    for i in 0..10_000u32 {
        counter.increment(format!("key-{i}").as_bytes());
    }

    let mut slot0 = vec![0u8; 8_000];
    let mut slot1 = vec![0u8; 8_000];
    let mut slot2 = vec![0u8; 8_000];
    let mut ser = Serializer::new();
    ser.register_region(&mut slot0);
    ser.register_region(&mut slot1);
    ser.register_region(&mut slot2);
    counter.serialize(&mut ser).unwrap();

    ser.reset();
    let mut restored = HyperLogLogCounter::new(4);
    restored.unserialize(&mut ser).unwrap();
    assert_eq!(restored, counter);
}

#[test]
fn test_unserialize_rejects_inconsistent_geometry() {
    let mut region = [0u8; 64];
    let mut ser = Serializer::new();
    ser.register_region(&mut region);
    ser.write_u32(10).unwrap(); // b
    ser.write_u32(512).unwrap(); // m != 1 << b
    ser.write_u32(511).unwrap();
    ser.reset();

    let mut counter = HyperLogLogCounter::new(4);
    let err = counter.unserialize(&mut ser).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[test]
fn test_fresh_is_empty_with_same_precision() {
    let mut counter = HyperLogLogCounter::new(14);
    counter.increment(b"something");
    let fresh = counter.fresh();
    assert_eq!(fresh.b(), 14);
    assert_eq!(fresh.count(), 0);
}

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

//! Streaming cardinality (approximate distinct-count) estimators.
//!
//! Each estimator is a mergeable probabilistic sketch with a fixed memory
//! budget chosen at construction. Independent workers build partial sketches
//! over partitions of a key stream and combine them with `merge_from`;
//! snapshots serialize byte-exactly into caller-owned fixed-capacity storage
//! through [`serializer::Serializer`], so partial state can live inside a
//! host engine's per-group aggregation slots.
//!
//! Estimators:
//!
//! - [`linear::LinearProbabilisticCounter`]: bitset-based linear counting.
//! - [`kmv::KMinValuesCounter`]: k smallest hash values.
//! - [`hll::HyperLogLogCounter`]: HyperLogLog with owned buckets.
//! - [`hll::HyperLogLogPlacementCounter`]: HyperLogLog over caller-owned
//!   storage, allocation-free.
//! - [`dummy::DummyCounter`]: exact baseline for differential testing.
//!
//! [`estimator::Estimator`] dispatches over the owned variants behind a
//! single configuration value.
//!
//! A sketch instance is single-owner: no operation is safe to call
//! concurrently on one instance without external synchronization.
//! Concurrency across instances, with a merge reduction at the end, is the
//! intended usage.
//!
//! # Examples
//!
//! ```
//! use cardsketch::estimator::Estimator;
//! use cardsketch::estimator::EstimatorKind;
//!
//! let mut workers: Vec<_> = (0..4)
//!     .map(|_| Estimator::new(EstimatorKind::HyperLogLog, 12).unwrap())
//!     .collect();
//! for i in 0..10_000u32 {
//!     workers[(i % 4) as usize].increment(&i.to_le_bytes());
//! }
//!
//! let (total, rest) = workers.split_first_mut().unwrap();
//! for partial in rest {
//!     total.merge_from(partial).unwrap();
//! }
//! let estimate = total.count() as f64;
//! assert!((estimate - 10_000.0).abs() / 10_000.0 < 0.1);
//! ```

pub mod dummy;
pub mod error;
pub mod estimator;
pub mod hash;
pub mod hll;
pub mod kmv;
pub mod linear;
pub mod serializer;

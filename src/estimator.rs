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

//! Estimator selection and uniform dispatch.
//!
//! A host aggregation engine picks an estimator with an [`EstimatorKind`] and
//! one precision parameter at construction time, then drives the resulting
//! [`Estimator`] through the common lifecycle: initialize, increment many,
//! combine with peer partial states, read the final estimate. The enum is
//! closed: every variant supports the whole capability set, with
//! variant-specific state behind it.
//!
//! The placement HyperLogLog variant is not constructible through this
//! facade. It borrows caller storage and would tie the whole facade to that
//! storage's lifetime; hosts that want it construct
//! [`HyperLogLogPlacementCounter`](crate::hll::HyperLogLogPlacementCounter)
//! directly against their slot regions.

use std::fmt;

use crate::dummy::DummyCounter;
use crate::error::Error;
use crate::hll::HyperLogLogCounter;
use crate::kmv::KMinValuesCounter;
use crate::linear::LinearProbabilisticCounter;
use crate::serializer::Serializer;

/// Which estimator backs an [`Estimator`].
///
/// The precision parameter passed to [`Estimator::new`] is interpreted per
/// kind: bitset size in bits, heap capacity k, HyperLogLog precision b, and
/// ignored for `Dummy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorKind {
    LinearProbabilistic,
    KMinValues,
    HyperLogLog,
    Dummy,
}

/// A cardinality estimator selected at construction time.
///
/// All variants support increment, count, merge, fresh, serialize,
/// unserialize, and a human-readable `Display`.
#[derive(Debug, Clone)]
pub enum Estimator {
    LinearProbabilistic(LinearProbabilisticCounter),
    KMinValues(KMinValuesCounter),
    HyperLogLog(HyperLogLogCounter),
    Dummy(DummyCounter),
}

impl Estimator {
    /// Creates an estimator of the given kind.
    ///
    /// `param` must be at least 1 for the bitset and k-minimum-values
    /// estimators; the HyperLogLog precision is clamped to its valid range
    /// and `Dummy` ignores the parameter.
    pub fn new(kind: EstimatorKind, param: u32) -> Result<Self, Error> {
        match kind {
            EstimatorKind::LinearProbabilistic => {
                if param == 0 {
                    return Err(Error::invalid_argument("size_in_bits must be at least 1"));
                }
                Ok(Estimator::LinearProbabilistic(
                    LinearProbabilisticCounter::new(param as usize),
                ))
            }
            EstimatorKind::KMinValues => {
                if param == 0 {
                    return Err(Error::invalid_argument("k must be at least 1"));
                }
                Ok(Estimator::KMinValues(KMinValuesCounter::new(
                    param as usize,
                )))
            }
            EstimatorKind::HyperLogLog => {
                Ok(Estimator::HyperLogLog(HyperLogLogCounter::new(param)))
            }
            EstimatorKind::Dummy => Ok(Estimator::Dummy(DummyCounter::new())),
        }
    }

    /// Returns the kind backing this estimator.
    pub fn kind(&self) -> EstimatorKind {
        match self {
            Estimator::LinearProbabilistic(_) => EstimatorKind::LinearProbabilistic,
            Estimator::KMinValues(_) => EstimatorKind::KMinValues,
            Estimator::HyperLogLog(_) => EstimatorKind::HyperLogLog,
            Estimator::Dummy(_) => EstimatorKind::Dummy,
        }
    }

    /// Records one key.
    pub fn increment(&mut self, key: &[u8]) {
        match self {
            Estimator::LinearProbabilistic(counter) => counter.increment(key),
            Estimator::KMinValues(counter) => counter.increment(key),
            Estimator::HyperLogLog(counter) => counter.increment(key),
            Estimator::Dummy(counter) => counter.increment(key),
        }
    }

    /// Records a pre-hashed key (`Dummy` counts it like any increment).
    pub fn increment_hashed(&mut self, hash: u64) {
        match self {
            Estimator::LinearProbabilistic(counter) => counter.increment_hashed(hash),
            Estimator::KMinValues(counter) => counter.increment_hashed(hash),
            Estimator::HyperLogLog(counter) => counter.increment_hashed(hash),
            Estimator::Dummy(counter) => counter.increment_hashed(hash),
        }
    }

    /// Estimates the number of distinct keys observed (exact for `Dummy`).
    pub fn count(&self) -> u64 {
        match self {
            Estimator::LinearProbabilistic(counter) => counter.count(),
            Estimator::KMinValues(counter) => counter.count(),
            Estimator::HyperLogLog(counter) => counter.count(),
            Estimator::Dummy(counter) => counter.count(),
        }
    }

    /// Combines `other`'s partial state into this estimator.
    ///
    /// Fails with `ParameterMismatch` when the kinds or their precision
    /// parameters differ, leaving this estimator unmodified. For
    /// `KMinValues`, the merge drains `other` (see
    /// [`KMinValuesCounter::merge_from`]); the other kinds read it.
    pub fn merge_from(&mut self, other: &mut Estimator) -> Result<(), Error> {
        match (self, other) {
            (Estimator::LinearProbabilistic(dst), Estimator::LinearProbabilistic(src)) => {
                dst.merge_from(src)
            }
            (Estimator::KMinValues(dst), Estimator::KMinValues(src)) => dst.merge_from(src),
            (Estimator::HyperLogLog(dst), Estimator::HyperLogLog(src)) => dst.merge_from(src),
            (Estimator::Dummy(dst), Estimator::Dummy(src)) => {
                dst.merge_from(src);
                Ok(())
            }
            (dst, src) => Err(Error::parameter_mismatch(
                "estimator kind",
                format!("{:?}", dst.kind()),
                format!("{:?}", src.kind()),
            )),
        }
    }

    /// Returns an empty estimator of identical kind and configuration.
    pub fn fresh(&self) -> Estimator {
        match self {
            Estimator::LinearProbabilistic(counter) => {
                Estimator::LinearProbabilistic(counter.fresh())
            }
            Estimator::KMinValues(counter) => Estimator::KMinValues(counter.fresh()),
            Estimator::HyperLogLog(counter) => Estimator::HyperLogLog(counter.fresh()),
            Estimator::Dummy(counter) => Estimator::Dummy(counter.fresh()),
        }
    }

    /// Writes this estimator's snapshot.
    ///
    /// The layout is the backing variant's wire format; no kind tag is
    /// written. The host stores the kind alongside the regions and must
    /// unserialize into an estimator of the same kind.
    pub fn serialize(&self, ser: &mut Serializer<'_>) -> Result<(), Error> {
        match self {
            Estimator::LinearProbabilistic(counter) => counter.serialize(ser),
            Estimator::KMinValues(counter) => counter.serialize(ser),
            Estimator::HyperLogLog(counter) => counter.serialize(ser),
            Estimator::Dummy(counter) => counter.serialize(ser),
        }
    }

    /// Reads back a snapshot written by an estimator of the same kind.
    pub fn unserialize(&mut self, ser: &mut Serializer<'_>) -> Result<(), Error> {
        match self {
            Estimator::LinearProbabilistic(counter) => counter.unserialize(ser),
            Estimator::KMinValues(counter) => counter.unserialize(ser),
            Estimator::HyperLogLog(counter) => counter.unserialize(ser),
            Estimator::Dummy(counter) => counter.unserialize(ser),
        }
    }
}

impl fmt::Display for Estimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Estimator::LinearProbabilistic(counter) => counter.fmt(f),
            Estimator::KMinValues(counter) => counter.fmt(f),
            Estimator::HyperLogLog(counter) => counter.fmt(f),
            Estimator::Dummy(counter) => counter.fmt(f),
        }
    }
}

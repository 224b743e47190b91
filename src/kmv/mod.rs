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

//! K-minimum-values distinct-count estimation.
//!
//! The sketch retains the k smallest 64-bit hash values seen so far. Under a
//! uniform hash, the kth minimum is a proxy for the density of distinct
//! values in the hash space, giving the estimate
//! `2^64 * (k - 1) / max_of_min`.
//!
//! Merging is **destructive on the source**: the source heap is drained into
//! the destination and must not be used afterward. The result converges to
//! the same k smallest values regardless of combination order, but callers
//! must track which operand survives. See
//! [`KMinValuesCounter::merge_from`].

mod sketch;

pub use self::sketch::KMinValuesCounter;

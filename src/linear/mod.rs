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

//! Linear probabilistic counting over a fixed-size bitset.
//!
//! Each key hashes to one bit position; the estimate is derived from the
//! fraction of bits still unset (`-n * ln(unset/n)`). Memory is fixed at
//! construction: `size_in_bits` bits, regardless of how many keys arrive.
//! Precision improves with bitset size; sizes on the order of a few million
//! bits are typical for production loads.
//!
//! Merging two counters of equal size is a bitwise OR, which is commutative,
//! associative, and idempotent, so partial counters built by independent
//! workers can be combined in any reduction order.

mod sketch;

pub use self::sketch::LinearProbabilisticCounter;
